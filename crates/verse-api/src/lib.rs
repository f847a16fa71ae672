pub mod auth;
pub mod error;
pub mod middleware;
pub mod password;
pub mod posts;
pub mod routes;
pub mod session;
pub mod stats;
pub mod token;

pub use auth::{AppState, AppStateInner};
