use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::models::{
    DeleteAck, Event, EventFields, InsertAck, UpdateAck, Volunteer, VolunteerFields,
    VolunteerProfile,
};
use crate::store::{EventStore, StoreError, StoreResult, VolunteerStore};

/// In-memory stand-in for `MongoStore`
#[derive(Default)]
pub struct MockStore {
    volunteers: RwLock<Vec<Volunteer>>,
    events: RwLock<Vec<Event>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every insert, update and delete fail as if the database went away
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every list and lookup fail the same way
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_readable(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store rejects reads".into()));
        }
        Ok(())
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store rejects writes".into()));
        }
        Ok(())
    }

    /// Full stored record, without projection
    pub async fn volunteer_record(&self, id: &ObjectId) -> Option<Volunteer> {
        let volunteers = self.volunteers.read().await;
        volunteers.iter().find(|v| v.id.as_ref() == Some(id)).cloned()
    }

    pub async fn event_record(&self, id: &ObjectId) -> Option<Event> {
        let events = self.events.read().await;
        events.iter().find(|e| e.id.as_ref() == Some(id)).cloned()
    }

    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

fn inserted(id: ObjectId) -> InsertAck {
    InsertAck {
        acknowledged: true,
        inserted_id: id.to_hex(),
    }
}

#[async_trait]
impl VolunteerStore for MockStore {
    async fn list_volunteers(&self) -> StoreResult<Vec<Volunteer>> {
        self.check_readable()?;
        Ok(self.volunteers.read().await.clone())
    }

    async fn get_volunteer(&self, id: &ObjectId) -> StoreResult<Option<VolunteerProfile>> {
        self.check_readable()?;
        Ok(self
            .volunteer_record(id)
            .await
            .and_then(|v| VolunteerProfile::project(&v)))
    }

    async fn create_volunteer(&self, mut volunteer: Volunteer) -> StoreResult<InsertAck> {
        self.check_writable()?;
        let id = *volunteer.id.get_or_insert_with(ObjectId::new);
        self.volunteers.write().await.push(volunteer);
        Ok(inserted(id))
    }

    async fn replace_volunteer_fields(
        &self,
        id: &ObjectId,
        fields: VolunteerFields,
    ) -> StoreResult<UpdateAck> {
        self.check_writable()?;
        let mut volunteers = self.volunteers.write().await;
        let (matched_count, modified_count) =
            match volunteers.iter_mut().find(|v| v.id.as_ref() == Some(id)) {
                Some(volunteer) => {
                    let before = volunteer.clone();
                    fields.apply_to(volunteer);
                    (1, u64::from(*volunteer != before))
                }
                None => (0, 0),
            };
        Ok(UpdateAck {
            acknowledged: true,
            matched_count,
            modified_count,
        })
    }

    async fn delete_volunteer(&self, id: &ObjectId) -> StoreResult<DeleteAck> {
        self.check_writable()?;
        let mut volunteers = self.volunteers.write().await;
        let before = volunteers.len();
        volunteers.retain(|v| v.id.as_ref() != Some(id));
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - volunteers.len()) as u64,
        })
    }
}

#[async_trait]
impl EventStore for MockStore {
    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        self.check_readable()?;
        Ok(self.events.read().await.clone())
    }

    async fn get_event(&self, id: &ObjectId) -> StoreResult<Option<EventFields>> {
        self.check_readable()?;
        Ok(self.event_record(id).await.map(|e| EventFields::project(&e)))
    }

    async fn create_event(&self, mut event: Event) -> StoreResult<InsertAck> {
        self.check_writable()?;
        let id = *event.id.get_or_insert_with(ObjectId::new);
        self.events.write().await.push(event);
        Ok(inserted(id))
    }

    async fn replace_event_fields(
        &self,
        id: &ObjectId,
        fields: EventFields,
    ) -> StoreResult<UpdateAck> {
        self.check_writable()?;
        let mut events = self.events.write().await;
        let (matched_count, modified_count) =
            match events.iter_mut().find(|e| e.id.as_ref() == Some(id)) {
                Some(event) => {
                    let before = event.clone();
                    fields.apply_to(event);
                    (1, u64::from(*event != before))
                }
                None => (0, 0),
            };
        Ok(UpdateAck {
            acknowledged: true,
            matched_count,
            modified_count,
        })
    }

    async fn delete_event(&self, id: &ObjectId) -> StoreResult<DeleteAck> {
        self.check_writable()?;
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id.as_ref() != Some(id));
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - events.len()) as u64,
        })
    }
}
