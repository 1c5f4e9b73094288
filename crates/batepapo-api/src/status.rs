use axum::{extract::State, http::StatusCode, response::IntoResponse};

use batepapo_types::models::now_millis;

use crate::error::ApiError;
use crate::identity::Requester;
use crate::state::{AppState, with_store};

/// POST /status: refreshes the caller's `lastStatus` so the sweep keeps them.
pub async fn heartbeat(
    State(state): State<AppState>,
    Requester(user): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let touched =
        with_store(&state, move |store| Ok(store.touch_participant(&user, now_millis())?)).await?;

    if !touched {
        return Err(ApiError::NotFound("Usuário não existe na lista de participantes"));
    }
    Ok(StatusCode::OK)
}
