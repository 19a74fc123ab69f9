use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use log::{error, info};
use volunteer_network_shared::identity::RequestIdentity;
use volunteer_network_shared::models::{DeleteAck, Event, EventFields, UpdateAck};
use volunteer_network_shared::store::EventStore;

use super::parse_object_id;
use crate::error::Result;
use crate::models::{EventCreatedResponse, EventResponse};
use crate::routes::AppState;

pub const EVENT_CREATED_MESSAGE: &str = "Event inserted successfully";

// POST /events
// Two steps: the image is written to disk first, then the document is inserted.
// If the insert fails the freshly written image is removed again.
pub async fn create_event<S>(
    State(state): State<AppState<S>>,
    identity: Option<Extension<RequestIdentity>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EventCreatedResponse>)>
where
    S: EventStore,
{
    let identity = identity.map(|Extension(identity)| identity);
    let dir = state.uploader.destination(identity.as_ref())?;
    let form = state.uploader.read_event_form(&dir, multipart).await?;

    let mut event = Event::from_form_fields(form.fields);
    if let Some(image) = &form.image {
        event.image_url = Some(image.filename.clone());
    }

    match state.store.create_event(event).await {
        Ok(result) => {
            match &form.image {
                Some(image) => info!(
                    "Inserted event {} with image {} ({} bytes)",
                    result.inserted_id, image.filename, image.size
                ),
                None => info!("Inserted event {} without image", result.inserted_id),
            }
            Ok((
                StatusCode::CREATED,
                Json(EventCreatedResponse {
                    message: EVENT_CREATED_MESSAGE.to_string(),
                    result,
                }),
            ))
        }
        Err(e) => {
            error!("Event insert failed: {}", e);
            if let Some(image) = &form.image {
                state.uploader.discard(image).await;
            }
            Err(e.into())
        }
    }
}

// GET /events
pub async fn list_events<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<EventResponse>>>
where
    S: EventStore,
{
    let events = state.store.list_events().await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

// GET /events/:id
pub async fn get_event<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<EventFields>>>
where
    S: EventStore,
{
    let id = parse_object_id(&id)?;
    let summary = state.store.get_event(&id).await?;

    Ok(Json(summary))
}

// PATCH /events/:id
pub async fn update_event<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(payload): Json<EventFields>,
) -> Result<Json<UpdateAck>>
where
    S: EventStore,
{
    let id = parse_object_id(&id)?;
    let ack = state.store.replace_event_fields(&id, payload).await?;

    info!(
        "Updated event {}: matched={}, modified={}",
        id, ack.matched_count, ack.modified_count
    );
    Ok(Json(ack))
}

// DELETE /events/:id
// The event's image stays on disk
pub async fn delete_event<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>>
where
    S: EventStore,
{
    let id = parse_object_id(&id)?;
    let ack = state.store.delete_event(&id).await?;

    info!("Deleted event {}: deleted={}", id, ack.deleted_count);
    Ok(Json(ack))
}
