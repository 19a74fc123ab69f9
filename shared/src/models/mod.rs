use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a volunteer lookup returns. `name` is not part of the projection.
pub fn volunteer_profile_projection() -> Document {
    doc! {
        "_id": 1,
        "email": 1,
        "date": 1,
        "imageUrl": 1,
        "description": 1,
        "phone": 1,
        "country": 1,
    }
}

/// Fields an event lookup returns. The id is excluded.
pub fn event_summary_projection() -> Document {
    doc! {
        "_id": 0,
        "event": 1,
        "date": 1,
        "imageUrl": 1,
        "description": 1,
    }
}

fn opt_bson(value: &Option<String>) -> Bson {
    match value {
        Some(v) => Bson::String(v.clone()),
        None => Bson::Null,
    }
}

/// A document in the `volunteers` collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The volunteer fields a create or replace request may carry.
/// Anything else in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl VolunteerFields {
    /// Builds the `$set` body for a replace. Every whitelisted field is written,
    /// so a field missing from the request ends up `null` in the store.
    pub fn to_set_document(&self) -> Document {
        doc! {
            "name": opt_bson(&self.name),
            "email": opt_bson(&self.email),
            "date": opt_bson(&self.date),
            "imageUrl": opt_bson(&self.image_url),
            "description": opt_bson(&self.description),
            "phone": opt_bson(&self.phone),
            "country": opt_bson(&self.country),
        }
    }

    /// Applies a replace to an in-memory volunteer, mirroring `to_set_document`
    pub fn apply_to(&self, volunteer: &mut Volunteer) {
        volunteer.name = self.name.clone();
        volunteer.email = self.email.clone();
        volunteer.date = self.date.clone();
        volunteer.image_url = self.image_url.clone();
        volunteer.description = self.description.clone();
        volunteer.phone = self.phone.clone();
        volunteer.country = self.country.clone();
    }
}

impl From<VolunteerFields> for Volunteer {
    fn from(fields: VolunteerFields) -> Self {
        Volunteer {
            id: None,
            name: fields.name,
            email: fields.email,
            date: fields.date,
            image_url: fields.image_url,
            description: fields.description,
            phone: fields.phone,
            country: fields.country,
        }
    }
}

/// Projected view of a volunteer returned by a lookup by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl VolunteerProfile {
    /// Projects a full volunteer record. Returns `None` for a record that was never stored.
    pub fn project(volunteer: &Volunteer) -> Option<Self> {
        Some(VolunteerProfile {
            id: volunteer.id?,
            email: volunteer.email.clone(),
            date: volunteer.date.clone(),
            image_url: volunteer.image_url.clone(),
            description: volunteer.description.clone(),
            phone: volunteer.phone.clone(),
            country: volunteer.country.clone(),
        })
    }
}

/// A document in the `events` collection.
///
/// Caller-supplied fields outside the known set are kept in `extra`
/// and stored unmodified next to the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Builds an event from submitted form fields. Known keys land in their
    /// typed slots, everything else goes to `extra`.
    pub fn from_form_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut event = Event::default();
        for (name, value) in fields {
            match name.as_str() {
                "_id" => continue,
                "event" => event.event = Some(value),
                "date" => event.date = Some(value),
                "imageUrl" => event.image_url = Some(value),
                "description" => event.description = Some(value),
                _ => {
                    event.extra.insert(name, Value::String(value));
                }
            }
        }
        event
    }
}

/// Event fields covered by the lookup projection and by a replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventFields {
    pub fn to_set_document(&self) -> Document {
        doc! {
            "event": opt_bson(&self.event),
            "date": opt_bson(&self.date),
            "imageUrl": opt_bson(&self.image_url),
            "description": opt_bson(&self.description),
        }
    }

    pub fn apply_to(&self, event: &mut Event) {
        event.event = self.event.clone();
        event.date = self.date.clone();
        event.image_url = self.image_url.clone();
        event.description = self.description.clone();
    }

    pub fn project(event: &Event) -> Self {
        EventFields {
            event: event.event.clone(),
            date: event.date.clone(),
            image_url: event.image_url.clone(),
            description: event.description.clone(),
        }
    }
}

/// Result of an insert, shaped like the driver's acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
