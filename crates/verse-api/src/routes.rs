use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{posts, stats};

/// The full API surface. The auth gate wraps only the protected routes;
/// everything else is public.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/stats/views", get(stats::record_view))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/posts", post(posts::create_post))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
