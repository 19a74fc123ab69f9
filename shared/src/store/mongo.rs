use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson},
    options::FindOneOptions,
    results::InsertOneResult,
    Client, Collection, Database,
};

use super::{
    EventStore, StoreError, StoreResult, VolunteerStore, EVENTS_COLLECTION,
    VOLUNTEERS_COLLECTION,
};
use crate::models::{
    event_summary_projection, volunteer_profile_projection, DeleteAck, Event, EventFields,
    InsertAck, UpdateAck, Volunteer, VolunteerFields, VolunteerProfile,
};

enum Backend {
    Connected { client: Client, database: Database },
    Unavailable(String),
}

/// MongoDB-backed store for both collections.
///
/// Built once at startup and shared by every request. When the connection
/// could not be set up the store is created unavailable and each call fails
/// with `StoreError::Unavailable` instead of hanging.
pub struct MongoStore {
    backend: Backend,
}

impl MongoStore {
    pub fn new(client: Client, db_name: &str) -> Self {
        info!("Using MongoDB database '{}'", db_name);
        let database = client.database(db_name);
        Self {
            backend: Backend::Connected { client, database },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    fn database(&self) -> StoreResult<&Database> {
        match &self.backend {
            Backend::Connected { database, .. } => Ok(database),
            Backend::Unavailable(reason) => Err(StoreError::Unavailable(reason.clone())),
        }
    }

    fn volunteers(&self) -> StoreResult<Collection<Volunteer>> {
        Ok(self.database()?.collection(VOLUNTEERS_COLLECTION))
    }

    fn events(&self) -> StoreResult<Collection<Event>> {
        Ok(self.database()?.collection(EVENTS_COLLECTION))
    }

    /// Sends `ping` to the admin database to confirm the deployment is reachable
    pub async fn ping(&self) -> StoreResult<()> {
        let client = match &self.backend {
            Backend::Connected { client, .. } => client,
            Backend::Unavailable(reason) => return Err(StoreError::Unavailable(reason.clone())),
        };
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    /// Drops every document in both collections. Used by tests running against a real database.
    pub async fn clear(&self) -> StoreResult<()> {
        self.volunteers()?.delete_many(doc! {}, None).await?;
        self.events()?.delete_many(doc! {}, None).await?;
        Ok(())
    }
}

fn insert_ack(result: InsertOneResult) -> InsertAck {
    let inserted_id = match result.inserted_id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    };
    InsertAck {
        acknowledged: true,
        inserted_id,
    }
}

#[async_trait]
impl VolunteerStore for MongoStore {
    async fn list_volunteers(&self) -> StoreResult<Vec<Volunteer>> {
        let cursor = self.volunteers()?.find(doc! {}, None).await?;
        let volunteers: Vec<Volunteer> = cursor.try_collect().await?;
        debug!("Fetched {} volunteers", volunteers.len());
        Ok(volunteers)
    }

    async fn get_volunteer(&self, id: &ObjectId) -> StoreResult<Option<VolunteerProfile>> {
        let options = FindOneOptions::builder()
            .projection(volunteer_profile_projection())
            .build();
        let profile = self
            .volunteers()?
            .clone_with_type::<VolunteerProfile>()
            .find_one(doc! { "_id": *id }, options)
            .await?;
        Ok(profile)
    }

    async fn create_volunteer(&self, volunteer: Volunteer) -> StoreResult<InsertAck> {
        let result = self.volunteers()?.insert_one(volunteer, None).await?;
        Ok(insert_ack(result))
    }

    async fn replace_volunteer_fields(
        &self,
        id: &ObjectId,
        fields: VolunteerFields,
    ) -> StoreResult<UpdateAck> {
        let update = doc! { "$set": fields.to_set_document() };
        let result = self
            .volunteers()?
            .update_one(doc! { "_id": *id }, update, None)
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_volunteer(&self, id: &ObjectId) -> StoreResult<DeleteAck> {
        let result = self
            .volunteers()?
            .delete_one(doc! { "_id": *id }, None)
            .await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let cursor = self.events()?.find(doc! {}, None).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        debug!("Fetched {} events", events.len());
        Ok(events)
    }

    async fn get_event(&self, id: &ObjectId) -> StoreResult<Option<EventFields>> {
        let options = FindOneOptions::builder()
            .projection(event_summary_projection())
            .build();
        let summary = self
            .events()?
            .clone_with_type::<EventFields>()
            .find_one(doc! { "_id": *id }, options)
            .await?;
        Ok(summary)
    }

    async fn create_event(&self, event: Event) -> StoreResult<InsertAck> {
        let result = self.events()?.insert_one(event, None).await?;
        Ok(insert_ack(result))
    }

    async fn replace_event_fields(
        &self,
        id: &ObjectId,
        fields: EventFields,
    ) -> StoreResult<UpdateAck> {
        let update = doc! { "$set": fields.to_set_document() };
        let result = self
            .events()?
            .update_one(doc! { "_id": *id }, update, None)
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_event(&self, id: &ObjectId) -> StoreResult<DeleteAck> {
        let result = self.events()?.delete_one(doc! { "_id": *id }, None).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
