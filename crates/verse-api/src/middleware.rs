use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::{session, token};

/// Authentication gate for protected routes. Missing cookie is 401; a cookie
/// that fails signature verification is 403. On success the decoded claims
/// are bound to the request for handlers to pick up via `Extension`.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session::extract(&jar).ok_or(ApiError::Unauthorized)?;

    let claims = token::verify(&state.jwt_secret, &token).map_err(|_| ApiError::Forbidden)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
