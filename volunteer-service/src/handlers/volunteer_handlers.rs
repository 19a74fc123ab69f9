use axum::{
    extract::{Path, State},
    Json,
};
use log::info;
use volunteer_network_shared::models::{
    DeleteAck, InsertAck, UpdateAck, Volunteer, VolunteerFields,
};
use volunteer_network_shared::store::VolunteerStore;

use super::parse_object_id;
use crate::error::Result;
use crate::models::{VolunteerProfileResponse, VolunteerResponse};
use crate::routes::AppState;

// GET /volunteers
pub async fn list_volunteers<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<VolunteerResponse>>>
where
    S: VolunteerStore,
{
    let volunteers = state.store.list_volunteers().await?;

    Ok(Json(
        volunteers.into_iter().map(VolunteerResponse::from).collect(),
    ))
}

// GET /volunteers/:id
// Projected lookup; a missing volunteer is a `null` body, not an error
pub async fn get_volunteer<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<VolunteerProfileResponse>>>
where
    S: VolunteerStore,
{
    let id = parse_object_id(&id)?;
    let profile = state.store.get_volunteer(&id).await?;

    Ok(Json(profile.map(VolunteerProfileResponse::from)))
}

// POST /volunteers
pub async fn create_volunteer<S>(
    State(state): State<AppState<S>>,
    Json(payload): Json<VolunteerFields>,
) -> Result<Json<InsertAck>>
where
    S: VolunteerStore,
{
    let ack = state
        .store
        .create_volunteer(Volunteer::from(payload))
        .await?;

    info!("Inserted volunteer {}", ack.inserted_id);
    Ok(Json(ack))
}

// PATCH /volunteers/:id
// Replaces the whole whitelisted field set; fields left out of the body become null
pub async fn update_volunteer<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(payload): Json<VolunteerFields>,
) -> Result<Json<UpdateAck>>
where
    S: VolunteerStore,
{
    let id = parse_object_id(&id)?;
    let ack = state.store.replace_volunteer_fields(&id, payload).await?;

    info!(
        "Updated volunteer {}: matched={}, modified={}",
        id, ack.matched_count, ack.modified_count
    );
    Ok(Json(ack))
}

// DELETE /volunteers/:id
pub async fn delete_volunteer<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>>
where
    S: VolunteerStore,
{
    let id = parse_object_id(&id)?;
    let ack = state.store.delete_volunteer(&id).await?;

    info!("Deleted volunteer {}: deleted={}", id, ack.deleted_count);
    Ok(Json(ack))
}
