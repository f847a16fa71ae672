use serde::{Deserialize, Serialize};

// -- Session claims --

/// Identity claims embedded in the session token. Canonical definition lives
/// here in verse-types so the codec, the auth gate, and the handlers all
/// agree on one shape.
///
/// Serialized camelCase because the claim doubles as the `user` object in
/// auth responses. Deliberately carries no `exp`: a token stays valid until
/// the signing secret rotates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub avatar_url: String,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Claims,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub content: String,
}

/// A post joined with its author's display fields. Field names stay
/// snake_case on the wire, matching the denormalized feed rows clients
/// already consume.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub username: String,
    pub avatar_url: String,
}

// -- Stats --

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: i64,
}
