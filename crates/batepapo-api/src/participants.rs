use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};

use batepapo_types::Participant;
use batepapo_types::api::JoinRequest;
use batepapo_types::events::PresenceEvent;
use batepapo_types::models::now_millis;

use crate::error::ApiError;
use crate::sanitize::sanitize;
use crate::state::{AppState, with_store};

pub async fn join(
    State(state): State<AppState>,
    body: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        debug!("Rejected join body: {}", rejection);
        ApiError::Validation("Nome não pode ser vazio")
    })?;

    let name = sanitize(&req.name);
    if name.is_empty() {
        return Err(ApiError::Validation("Nome não pode ser vazio"));
    }

    let joined = name.clone();
    with_store(&state, move |store| {
        if store.find_participant(&name)?.is_some() {
            return Err(ApiError::Conflict("Esse nome já está sendo utilizado"));
        }

        // Another request can register the same name between the check and the insert
        if !store.insert_participant(&Participant::new(name.as_str(), now_millis()))? {
            return Err(ApiError::Conflict("Esse nome já está sendo utilizado"));
        }

        store.insert_message(&PresenceEvent::Joined.announce(&name))?;
        Ok(())
    })
    .await?;

    info!("{} joined the room", joined);
    Ok(StatusCode::CREATED)
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let participants = with_store(&state, |store| Ok(store.list_participants()?)).await?;
    Ok(Json(participants))
}
