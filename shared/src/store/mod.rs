use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{
    DeleteAck, Event, EventFields, InsertAck, UpdateAck, Volunteer, VolunteerFields,
    VolunteerProfile,
};

pub mod mongo;

pub const VOLUNTEERS_COLLECTION: &str = "volunteers";
pub const EVENTS_COLLECTION: &str = "events";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations on the `volunteers` collection
#[async_trait]
pub trait VolunteerStore: Send + Sync {
    async fn list_volunteers(&self) -> StoreResult<Vec<Volunteer>>;
    async fn get_volunteer(&self, id: &ObjectId) -> StoreResult<Option<VolunteerProfile>>;
    async fn create_volunteer(&self, volunteer: Volunteer) -> StoreResult<InsertAck>;
    async fn replace_volunteer_fields(
        &self,
        id: &ObjectId,
        fields: VolunteerFields,
    ) -> StoreResult<UpdateAck>;
    async fn delete_volunteer(&self, id: &ObjectId) -> StoreResult<DeleteAck>;
}

/// Operations on the `events` collection
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(&self) -> StoreResult<Vec<Event>>;
    async fn get_event(&self, id: &ObjectId) -> StoreResult<Option<EventFields>>;
    async fn create_event(&self, event: Event) -> StoreResult<InsertAck>;
    async fn replace_event_fields(&self, id: &ObjectId, fields: EventFields)
        -> StoreResult<UpdateAck>;
    async fn delete_event(&self, id: &ObjectId) -> StoreResult<DeleteAck>;
}
