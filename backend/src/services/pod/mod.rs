//! # Proof-of-Delivery Service Module
//!
//! This module aggregates all API endpoints of the photo filter engine and
//! the quality score. It acts as a router, directing incoming HTTP requests
//! under the `/api/pod` path to the appropriate handler.
//!
//! ## Sub-modules:
//! - `classify`: Runs a candidate list through one extraction tier.
//! - `fetchable`: URL-only filtering for pages without image dimensions.
//! - `score`: Evaluates the quality score rule table.
//! - `extract`: Schedules background extraction jobs for tracking tokens.
//! - `get_status`: Polls the status of an extraction job.
//! - `assets`: Lists or purges the persisted photo assets of a token.
//! - `metrics`: Computes the proof-of-delivery metrics of a consignment.

mod assets;
mod classify;
pub mod extract;
mod fetchable;
mod get_status;
mod metrics;
mod score;

use crate::config::Config;
use crate::db;
use crate::error::{Error, Result};
use crate::fetch::{HttpPageSource, TrackingPageSource};
use actix_web::web::{delete, get, post, scope};
use actix_web::{HttpResponse, Scope};
use log::error;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;

/// The base path for all proof-of-delivery endpoints.
const API_PATH: &str = "/api/pod";

/// Everything the handlers and extraction jobs need besides job state.
#[derive(Clone)]
pub struct PodContext {
    pub database: PathBuf,
    pub tracking_base_url: String,
    pub verify_assets: bool,
    pub source: Arc<dyn TrackingPageSource>,
}

impl PodContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            database: config.database.clone(),
            tracking_base_url: config.tracking_base_url.clone(),
            verify_assets: config.verify_assets,
            source: Arc::new(HttpPageSource::new(
                config.fetch_timeout(),
                config.user_agent.clone(),
            )),
        }
    }

    pub fn open_db(&self) -> Result<Connection> {
        db::open_database(&self.database)
    }
}

/// Runs blocking database work off the async runtime.
pub(crate) async fn with_db<T, F>(ctx: &PodContext, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
{
    let ctx = ctx.clone();
    actix_web::web::block(move || {
        let mut conn = ctx.open_db()?;
        work(&mut conn)
    })
    .await
    .map_err(|e| Error::Job(e.to_string()))?
}

/// Maps a service error onto the HTTP response the dashboard expects.
pub(crate) fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::InvalidInput(msg) => HttpResponse::BadRequest().body(msg.clone()),
        Error::NotFound(msg) => HttpResponse::NotFound().body(msg.clone()),
        Error::Database(_) => {
            error!("{}", err);
            HttpResponse::ServiceUnavailable().body(format!("Storage unavailable: {}", err))
        }
        _ => {
            error!("{}", err);
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}

/// Configures and returns the Actix `Scope` for all proof-of-delivery routes.
///
/// # Registered Routes:
///
/// *   **`POST /classify`**: `{ candidates, tier }` -> filtered photos of that tier.
/// *   **`POST /fetchable`**: `{ urls }` -> deduplicated `http(s)` URLs.
/// *   **`POST /score`**: rule table inputs -> quality score and breakdown.
/// *   **`POST /extract`**: schedules (or deduplicates, or serves from storage)
///     the extraction of a tracking page.
/// *   **`GET /status/{job_id}`**: current `JobStatus` of an extraction.
/// *   **`GET /assets/{token}`** / **`DELETE /assets/{token}`**: persisted assets
///     of a consignment, or their bulk purge.
/// *   **`POST /metrics/{token}`**: delivery metadata -> `PodMetrics` using the
///     stored asset counts.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/classify", post().to(classify::process))
        .route("/fetchable", post().to(fetchable::process))
        .route("/score", post().to(score::process))
        .route("/extract", post().to(extract::process))
        .route("/status/{job_id}", get().to(get_status::process))
        .route("/assets/{token}", get().to(assets::list))
        .route("/assets/{token}", delete().to(assets::purge))
        .route("/metrics/{token}", post().to(metrics::process))
}
