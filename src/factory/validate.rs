//! Schema validation: every context type declares an id and a child list, every service
//! type declares an id, and no declared id exceeds [`MAX_SLOT_ID`]. Depth-first, a node's
//! services before its children, stopping at the first violation.

use crate::error::SchemaError;
use crate::schema::{ContextSchema, ServiceSchema};
use crate::types::MAX_SLOT_ID;

pub fn check_context(schema: &ContextSchema) -> Result<(), SchemaError> {
    if !schema.is_context() {
        return Err(SchemaError::NotContext(schema.name().to_string()));
    }
    check_id(schema.name(), schema.context_id())?;
    if let Some(services) = schema.context_services() {
        for service in services {
            check_service(service)?;
        }
    }
    for child in schema.context_children() {
        check_context(child)?;
    }
    Ok(())
}

pub fn check_service(schema: &ServiceSchema) -> Result<(), SchemaError> {
    if !schema.is_service() {
        return Err(SchemaError::NotService(schema.name().to_string()));
    }
    check_id(schema.name(), schema.service_id())
}

fn check_id(name: &str, id: Option<usize>) -> Result<(), SchemaError> {
    match id {
        Some(id) if id > MAX_SLOT_ID => Err(SchemaError::IdOutOfRange {
            name: name.to_string(),
            id,
        }),
        _ => Ok(()),
    }
}
