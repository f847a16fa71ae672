use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::task;

use verse_types::api::ViewsResponse;

use crate::auth::AppState;
use crate::error::ApiError;

/// Increment the page view counter and return the post-increment value.
pub async fn record_view(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let views = task::spawn_blocking(move || db.db.record_view()).await??;

    Ok(Json(ViewsResponse { views }))
}
