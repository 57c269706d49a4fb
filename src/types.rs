//! Shared identifier types.

/// Schema id of a context type; index into its parent's child slots and key of the
/// registry's flat index
pub type ContextId = usize;

/// Schema id of a service type; index into its context's service slots
pub type ServiceId = usize;

/// External identity a personal registry is keyed by (session, tenant, ...)
pub type PersonalId = i64;

/// Id carried by the sentinel registry returned for unknown personal ids
pub const EMPTY_PERSONAL_ID: PersonalId = -1;

/// Largest context or service id a schema may declare; ids index dense slot vectors
pub const MAX_SLOT_ID: usize = u16::MAX as usize;
