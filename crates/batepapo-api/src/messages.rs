use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use uuid::Uuid;

use batepapo_types::api::{MessageQuery, SendMessageRequest};
use batepapo_types::{Message, MessageKind};

use crate::error::ApiError;
use crate::identity::Requester;
use crate::sanitize::sanitize;
use crate::state::{AppState, with_store};

pub async fn send_message(
    State(state): State<AppState>,
    Requester(user): Requester,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Sender is checked before the body is looked at
    let sender = user.clone();
    let registered =
        with_store(&state, move |store| Ok(store.find_participant(&sender)?.is_some())).await?;
    if !registered {
        return Err(ApiError::Validation("Usuário não existe na lista de participantes"));
    }

    let Json(req) = body.map_err(|rejection| {
        debug!("Rejected message body from {}: {}", user, rejection);
        ApiError::Validation("Mensagem precisa de to, text e type")
    })?;

    let to = sanitize(&req.to);
    let text = sanitize(&req.text);
    let kind = sanitize(&req.kind)
        .parse::<MessageKind>()
        .ok()
        .filter(MessageKind::is_user_postable)
        .ok_or(ApiError::Validation("Tipo deve ser message ou private_message"))?;
    if to.is_empty() || text.is_empty() {
        return Err(ApiError::Validation("Nem a mensagem nem o destinatário podem ser vazios"));
    }

    let message = Message::new(user, to, text, kind);
    debug!("{} -> {} ({})", message.from, message.to, message.kind);
    with_store(&state, move |store| Ok(store.insert_message(&message)?)).await?;

    Ok(StatusCode::CREATED)
}

pub async fn get_messages(
    State(state): State<AppState>,
    Requester(user): Requester,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unreadable query string (e.g. a repeated `limit`) means no limit
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let messages = with_store(&state, move |store| Ok(store.visible_messages(&user)?)).await?;
    Ok(Json(keep_last(messages, query.limit())))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Requester(user): Requester,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // A malformed id cannot name a stored message
    let id: Uuid = id.parse().map_err(|_| ApiError::NotFound("Não existe mensagem com esse ID"))?;

    with_store(&state, move |store| {
        let message = store
            .find_message(id)?
            .ok_or(ApiError::NotFound("Não existe mensagem com esse ID"))?;

        if !message.is_owned_by(&user) {
            return Err(ApiError::Unauthorized("Usuário não é dono da mensagem"));
        }

        store.delete_message(id)?;
        debug!("{} deleted message {}", user, id);
        Ok(())
    })
    .await?;

    Ok(StatusCode::OK)
}

/// Keeps only the newest `limit` messages, preserving their order.
fn keep_last<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        if items.len() > limit {
            items.drain(..items.len() - limit);
        }
    }
    items
}
