use axum::response::IntoResponse;
use axum::{Extension, Json, extract::State};
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::task;
use tracing::warn;

use verse_db::StoreError;
use verse_db::models::PostRow;
use verse_types::api::{Claims, CreatePostRequest, PostResponse};

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = task::spawn_blocking(move || db.db.list_posts()).await??;

    let posts: Vec<PostResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(posts))
}

/// The author id comes from the just-verified session claims, so the foreign
/// key check only fires if that user row has vanished underneath us.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = task::spawn_blocking(move || {
        db.db.create_post(claims.id, &req.content).map_err(|e| match e {
            StoreError::ForeignKey => ApiError::Validation("Author does not exist".into()),
            other => other.into(),
        })
    })
    .await??;

    Ok(Json(to_response(row)))
}

fn to_response(row: PostRow) -> PostResponse {
    let created_at = row
        .created_at
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on post {}: {}", row.created_at, row.id, e);
            DateTime::default()
        });

    PostResponse {
        id: row.id,
        user_id: row.user_id,
        content: row.content,
        created_at,
        username: row.username,
        avatar_url: row.avatar_url,
    }
}
