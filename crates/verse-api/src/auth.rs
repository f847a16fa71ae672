use std::sync::Arc;

use axum::response::IntoResponse;
use axum::{Extension, Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use tokio::task;

use verse_db::models::UserRow;
use verse_db::{Database, StoreError};
use verse_types::api::{AuthResponse, Claims, LoginRequest, SignupRequest};

use crate::error::ApiError;
use crate::{password, session, token};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if !req.email.contains('@') {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::Validation(
            "Username must be 3-32 characters".into(),
        ));
    }

    let avatar_url = avatar_url_for(&req.username);

    // Hashing is deliberately slow and the insert blocks, so both run off
    // the async runtime
    let db = state.clone();
    let user = task::spawn_blocking(move || {
        let digest = password::hash(&req.password)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;

        db.db
            .create_user(&req.email, &digest, &req.username, &avatar_url)
            .map_err(|e| match e {
                StoreError::Conflict => {
                    ApiError::Validation("Email already exists or invalid data".into())
                }
                other => other.into(),
            })
    })
    .await??;

    let claims = claims_for(&user);
    let token = token::issue(&state.jwt_secret, &claims)?;

    Ok((session::attach(jar, token), Json(AuthResponse { user: claims })))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let user = task::spawn_blocking(move || {
        let user = db
            .db
            .get_user_by_email(&req.email)?
            .ok_or(ApiError::InvalidCredentials)?;

        let ok = password::verify(&req.password, &user.password)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Stored digest rejected: {e}")))?;

        if !ok {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(user)
    })
    .await??;

    let claims = claims_for(&user);
    let token = token::issue(&state.jwt_secret, &claims)?;

    Ok((session::attach(jar, token), Json(AuthResponse { user: claims })))
}

/// The claims were verified by the auth gate; echo them back.
pub async fn me(Extension(claims): Extension<Claims>) -> Json<AuthResponse> {
    Json(AuthResponse { user: claims })
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        session::clear(jar),
        Json(serde_json::json!({ "success": true })),
    )
}

fn claims_for(user: &UserRow) -> Claims {
    Claims {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        avatar_url: user.avatar_url.clone(),
    }
}

/// Avatar is derived deterministically from the username at signup.
fn avatar_url_for(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}")
}
