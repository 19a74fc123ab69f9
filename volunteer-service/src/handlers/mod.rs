use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, Result};

pub mod event_handlers;
pub mod health_handlers;
pub mod volunteer_handlers;

/// Parses a path id, rejecting malformed ones as a client error
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::bad_request(format!("Invalid id: {}", id)))
}
