//! JSON endpoints for the curated video catalog and watch-time tracking.
//!
//! ## Endpoints
//!
//! - `GET    /api/get-videos`              - Curated video list from the config store
//! - `POST   /api/update-videos`           - Replace the curated video list
//! - `POST   /api/add-video`               - Register a YouTube video
//! - `DELETE /api/delete-video?videoId=`   - Remove a registered video
//! - `POST   /api/log-watch`               - Start or end a watch session
//! - `GET    /api/get-stats`               - Watch-time totals and rankings

mod config_store;
mod error;
mod handlers;
mod store;
mod youtube;

pub use config_store::{ConfigStore, FileConfigStore};
pub use error::{ApiError, ErrorBody};
pub use handlers::{PeriodTotal, WatchStats};
pub use store::{DailyTotal, TopOrder, Video, VideoStore, VideoTotals, WatchSession};
pub use youtube::extract_video_id;

use crate::config::{local_time, ServerConfig};
use crate::error::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub videos: Arc<VideoStore>,
    pub config: Arc<dyn ConfigStore>,
    pub time_zone: Tz,
}

impl ApiState {
    pub fn new(videos: VideoStore, config: impl ConfigStore + 'static, time_zone: Tz) -> Self {
        Self {
            videos: Arc::new(videos),
            config: Arc::new(config),
            time_zone,
        }
    }

    pub fn open(config: &ServerConfig) -> Result<Self> {
        Ok(Self::new(
            VideoStore::open(&config.database_path)?,
            FileConfigStore::new(&config.config_store_path),
            config.time_zone()?,
        ))
    }

    /// Wall-clock time in the configured zone.
    pub fn local_now(&self) -> NaiveDateTime {
        local_time(self.time_zone, Utc::now())
    }
}

/// Build the axum router for the catalog and watch endpoints.
pub fn create_router(state: ApiState) -> Router {
    use handlers::*;

    Router::new()
        .route(
            "/api/get-videos",
            get(get_videos).fallback(method_not_allowed),
        )
        .route(
            "/api/update-videos",
            post(update_videos).fallback(method_not_allowed),
        )
        .route(
            "/api/add-video",
            post(add_video).fallback(method_not_allowed),
        )
        .route(
            "/api/delete-video",
            delete(delete_video).fallback(method_not_allowed),
        )
        .route(
            "/api/log-watch",
            post(log_watch).fallback(metodo_no_permitido),
        )
        .route(
            "/api/get-stats",
            get(get_stats).fallback(metodo_no_permitido),
        )
        .with_state(state)
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let state = ApiState::open(config)?;
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        bind = %config.bind,
        database = %config.database_path.display(),
        "API server listening"
    );
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
