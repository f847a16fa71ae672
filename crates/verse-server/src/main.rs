use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use verse_api::auth::{AppState, AppStateInner};
use verse_api::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verse=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("VERSE_JWT_SECRET").unwrap_or_else(|_| "verse-secret-key-123".into());
    let db_path = std::env::var("VERSE_DB_PATH").unwrap_or_else(|_| "verse.db".into());
    let static_dir = std::env::var("VERSE_STATIC_DIR").unwrap_or_else(|_| "dist".into());
    let host = std::env::var("VERSE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VERSE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = verse_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Unrecognized routes fall through to the built client bundle
    let index = PathBuf::from(&static_dir).join("index.html");
    let app = routes::router(state)
        .fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Verse server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
