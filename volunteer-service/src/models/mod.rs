use serde::Serialize;
use serde_json::{Map, Value};
use volunteer_network_shared::models::{Event, InsertAck, Volunteer, VolunteerProfile};

// Response DTOs render ObjectIds as hex strings

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<Volunteer> for VolunteerResponse {
    fn from(v: Volunteer) -> Self {
        VolunteerResponse {
            id: v.id.map(|id| id.to_hex()),
            name: v.name,
            email: v.email,
            date: v.date,
            image_url: v.image_url,
            description: v.description,
            phone: v.phone,
            country: v.country,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<VolunteerProfile> for VolunteerProfileResponse {
    fn from(p: VolunteerProfile) -> Self {
        VolunteerProfileResponse {
            id: p.id.to_hex(),
            email: p.email,
            date: p.date,
            image_url: p.image_url,
            description: p.description,
            phone: p.phone,
            country: p.country,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        EventResponse {
            id: e.id.map(|id| id.to_hex()),
            event: e.event,
            date: e.date,
            image_url: e.image_url,
            description: e.description,
            extra: e.extra,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct EventCreatedResponse {
    pub message: String,
    pub result: InsertAck,
}
