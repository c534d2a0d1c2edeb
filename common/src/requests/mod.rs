use crate::model::photo::PhotoCandidate;
use serde::{Deserialize, Serialize};

/// Which extraction configuration to run a candidate list through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    Thumbnail,
    #[default]
    FullResolution,
    Legacy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub candidates: Vec<PhotoCandidate>,
    #[serde(default)]
    pub tier: ExtractionTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchableRequest {
    pub urls: Vec<String>,
}

/// Request payload for scheduling a photo extraction.
///
/// `tracking` is either a carrier tracking URL or the bare token. When `html`
/// or `candidates` is given the page is not fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractRequest {
    pub tracking: String,
    pub html: Option<String>,
    pub candidates: Option<Vec<PhotoCandidate>>,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub token: String,
    pub job_id: Option<String>,
    /// Served from already available assets, no job scheduled.
    pub cached: bool,
    /// An extraction for the same token was already running.
    pub deduplicated: bool,
}
