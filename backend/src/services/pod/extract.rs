//! # Photo Extraction Job Service
//!
//! This module provides the `POST /api/pod/extract` endpoint, which turns a
//! carrier tracking link into persisted `PhotoAsset` rows.
//!
//! ## Workflow:
//!
//! 1.  **Token**: The tracking token is the last path segment of the tracking
//!     URL (or the request value itself when a bare token is sent).
//!
//! 2.  **Deduplication**: At most one extraction per token is in flight. A
//!     request while one runs gets the existing `job_id` back, even when the
//!     running job has already stored some of its assets.
//!
//! 3.  **Stored results**: Unless `force` is set, a token that already has
//!     `available` assets is answered from the database and no job runs. The
//!     persisted asset status is the only cache.
//!
//! 4.  **Background Processing**: The job runs inside `spawn_blocking`: it
//!     obtains the page (inline HTML, inline candidates, or a fetch through the
//!     `TrackingPageSource`), classifies sized images with the full-resolution
//!     preset and images without dimensions by URL alone, persists them as
//!     `pending`, then marks each one `available` (optionally after
//!     downloading it to hash its content) or `failed`.
//!
//! 5.  **Progress Reporting**: The worker sends `JobUpdate` messages with a
//!     percentage; the final `Completed`/`Failed` status goes through the same
//!     channel so it can never be overwritten by a late progress message.

use crate::db::assets;
use crate::error::{Error, Result};
use crate::job_controller::state::{Claim, JobUpdate, JobsState};
use crate::pod::classifier::{classify_one, is_decoration};
use crate::pod::html::{scan_candidates, tracking_page_url, tracking_token};
use crate::pod::policy::PhotoFilterPolicy;
use crate::pod::{filter_fetchable_photos, is_valid_photo_url};
use crate::services::pod::{error_response, with_db, PodContext};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::{ExtractionSummary, JobStatus};
use common::model::photo::{FilteredPhoto, PhotoCandidate, PhotoKind};
use common::requests::{ExtractRequest, ExtractResponse};
use log::{debug, info, warn};
use std::collections::HashSet;
use tokio::sync::mpsc;
use url::Url;

/// One scheduled extraction, moved into the blocking worker.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub job_id: String,
    pub token: String,
    pub page_url: String,
    pub html: Option<String>,
    pub candidates: Option<Vec<PhotoCandidate>>,
}

/// The Actix web handler for `POST /api/pod/extract`.
pub(crate) async fn process(
    jobs: web::Data<JobsState>,
    ctx: web::Data<PodContext>,
    payload: web::Json<ExtractRequest>,
) -> impl Responder {
    match schedule_extraction(jobs.get_ref().clone(), ctx.get_ref().clone(), payload.into_inner())
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(&err),
    }
}

fn page_url_for(tracking: &str, token: &str, base_url: &str) -> String {
    let tracking = tracking.trim();
    match Url::parse(tracking) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => tracking.to_string(),
        _ => tracking_page_url(base_url, token),
    }
}

fn deduplicated(token: String, job_id: String) -> ExtractResponse {
    ExtractResponse {
        token,
        job_id: Some(job_id),
        cached: false,
        deduplicated: true,
    }
}

/// Schedules the extraction of a tracking page, or explains why none is needed.
pub async fn schedule_extraction(
    jobs: JobsState,
    ctx: PodContext,
    req: ExtractRequest,
) -> Result<ExtractResponse> {
    let token = tracking_token(&req.tracking)
        .ok_or_else(|| Error::InvalidInput(format!("no tracking token in '{}'", req.tracking)))?;

    if let Some(job_id) = jobs.running(&token).await {
        info!("Extraction for {} already running as {}", token, job_id);
        return Ok(deduplicated(token, job_id));
    }

    if !req.force {
        let lookup = token.clone();
        let cached = with_db(&ctx, move |conn| assets::has_available(conn, &lookup)).await?;
        if cached {
            debug!("Serving stored assets for {}", token);
            return Ok(ExtractResponse {
                token,
                job_id: None,
                cached: true,
                deduplicated: false,
            });
        }
    }

    let job_id = match jobs.claim(&token).await {
        Claim::Existing(job_id) => {
            info!("Extraction for {} already running as {}", token, job_id);
            return Ok(deduplicated(token, job_id));
        }
        Claim::New(job_id) => job_id,
    };

    let job = ExtractionJob {
        job_id: job_id.clone(),
        token: token.clone(),
        page_url: page_url_for(&req.tracking, &token, &ctx.tracking_base_url),
        html: req.html,
        candidates: req.candidates,
    };
    info!("Scheduled extraction {} for {}", job_id, token);

    tokio::spawn(async move {
        let tx = jobs.tx.clone();
        let job_token = job.token.clone();
        let job_key = job.job_id.clone();

        let handle = tokio::task::spawn_blocking(move || run_extraction(&ctx, &tx, &job));

        let status = match handle.await {
            Ok(Ok(summary)) => {
                info!(
                    "Extraction {} finished: {} photos, {} signatures",
                    job_key, summary.photos, summary.signatures
                );
                JobStatus::Completed(serde_json::to_string(&summary).unwrap_or_default())
            }
            Ok(Err(e)) => {
                warn!("Extraction {} failed: {}", job_key, e);
                JobStatus::Failed(e.to_string())
            }
            Err(join_err) => JobStatus::Failed(format!("join error: {}", join_err)),
        };

        let _ = jobs.tx.send(JobUpdate::new(job_key, status)).await;
        jobs.release(&job_token).await;
    });

    Ok(ExtractResponse {
        token,
        job_id: Some(job_id),
        cached: false,
        deduplicated: false,
    })
}

fn progress(tx: &mpsc::Sender<JobUpdate>, job_id: &str, percent: u32) {
    let _ = tx.blocking_send(JobUpdate::new(job_id, JobStatus::InProgress(percent)));
}

fn gather_candidates(ctx: &PodContext, job: &ExtractionJob) -> Result<Vec<PhotoCandidate>> {
    if let Some(candidates) = &job.candidates {
        return Ok(candidates.clone());
    }
    let html = match &job.html {
        Some(html) => html.clone(),
        None => ctx.source.fetch_html(&job.page_url)?,
    };
    Ok(scan_candidates(&html, Some(&job.page_url)))
}

/// Classifies a page, candidate by candidate, in input order.
///
/// Sized candidates go through the full-resolution filter. A candidate
/// without dimensions can only be judged by its URL: it must not be a loading
/// or brand image, must be fetchable and must pass the photo URL rules. It is
/// then stored as a `photo` of unknown size. The second value counts those.
fn page_photos(candidates: &[PhotoCandidate]) -> (Vec<FilteredPhoto>, u32) {
    let policy = PhotoFilterPolicy::full_resolution();

    let unsized_urls: Vec<String> = candidates
        .iter()
        .filter(|c| !c.has_dimensions() && !is_decoration(c, policy.brand_exclusion))
        .map(|c| c.src.clone())
        .collect();
    let admitted: HashSet<String> = filter_fetchable_photos(&unsized_urls)
        .into_iter()
        .filter(|url| is_valid_photo_url(url))
        .collect();

    let mut photos = Vec::new();
    let mut seen = HashSet::new();
    let mut url_only = 0;
    for candidate in candidates {
        if candidate.has_dimensions() {
            photos.extend(classify_one(candidate, &policy));
            continue;
        }
        let url = candidate.src.trim();
        if admitted.contains(url) && seen.insert(url) {
            url_only += 1;
            photos.push(FilteredPhoto {
                url: url.to_string(),
                kind: PhotoKind::Photo,
                width: 0,
                height: 0,
                is_thumbnail: None,
            });
        }
    }
    (photos, url_only)
}

/// MD5 of the URL without query and fragment. Signed storage links change
/// their query string on every page load while pointing at the same blob.
pub fn location_key(url: &str) -> String {
    let stable = match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    };
    format!("{:x}", md5::compute(stable.as_bytes()))
}

/// Blocking body of an extraction job.
pub fn run_extraction(
    ctx: &PodContext,
    tx: &mpsc::Sender<JobUpdate>,
    job: &ExtractionJob,
) -> Result<ExtractionSummary> {
    let mut conn = ctx.open_db()?;
    progress(tx, &job.job_id, 0);

    let candidates = match gather_candidates(ctx, job) {
        Ok(candidates) => candidates,
        Err(err) => {
            assets::record_page_failure(&conn, &job.token, &job.page_url, &err.to_string())?;
            return Err(err);
        }
    };
    progress(tx, &job.job_id, 25);

    let (photos, url_only) = page_photos(&candidates);
    debug!(
        "{}: kept {} of {} candidates, {} by URL rules only",
        job.token,
        photos.len(),
        candidates.len(),
        url_only
    );

    assets::insert_pending(&mut conn, &job.token, &photos)?;
    progress(tx, &job.job_id, 50);

    let mut summary = ExtractionSummary {
        token: job.token.clone(),
        candidates: candidates.len() as u32,
        url_only,
        ..ExtractionSummary::default()
    };

    let total = photos.len().max(1) as u32;
    for (index, photo) in photos.iter().enumerate() {
        let outcome = if ctx.verify_assets {
            ctx.source
                .fetch_bytes(&photo.url)
                .map(|bytes| format!("{:x}", md5::compute(&bytes)))
        } else {
            Ok(location_key(&photo.url))
        };

        match outcome {
            Ok(hash) => {
                assets::mark_available(&conn, &job.token, &photo.url, Some(&hash))?;
                match photo.kind {
                    PhotoKind::Photo => summary.photos += 1,
                    PhotoKind::Signature => summary.signatures += 1,
                }
            }
            Err(err) => {
                warn!("{}: asset {} failed: {}", job.token, photo.url, err);
                assets::mark_failed(&conn, &job.token, &photo.url, &err.to_string())?;
                summary.failed += 1;
            }
        }
        progress(tx, &job.job_id, 50 + 50 * (index as u32 + 1) / total);
    }

    Ok(summary)
}
