use std::sync::Arc;

use batepapo_db::ChatStore;
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Box<dyn ChatStore>,
}

impl AppStateInner {
    pub fn new(store: impl ChatStore + 'static) -> AppState {
        Arc::new(Self {
            store: Box::new(store),
        })
    }
}

/// Runs blocking store work off the async runtime.
pub async fn with_store<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ChatStore) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.store.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
}
