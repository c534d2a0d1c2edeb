use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}

/// Outcome of one extraction job, serialized into `JobStatus::Completed`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub token: String,
    /// `<img>` candidates found on the page (or supplied inline).
    pub candidates: u32,
    pub photos: u32,
    pub signatures: u32,
    /// Assets whose download failed during verification.
    pub failed: u32,
    /// Assets kept on URL rules alone because the page gave no size for them.
    pub url_only: u32,
}
