use crate::model::photo::PhotoKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a persisted photo asset.
///
/// Rows start as `Pending` when extraction is scheduled and move to
/// `Available` or `Failed`. They are only removed by a bulk purge of the
/// consignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Pending,
    Available,
    Failed,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Pending => "pending",
            AssetStatus::Available => "available",
            AssetStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AssetStatus::Pending),
            "available" => Some(AssetStatus::Available),
            "failed" => Some(AssetStatus::Failed),
            _ => None,
        }
    }
}

/// A proof-of-delivery image stored against a tracking token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAsset {
    pub id: String,
    /// Tracking token of the consignment the image belongs to.
    pub token: String,
    pub url: String,
    pub kind: PhotoKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Content (or location) key used to collapse re-fetches of the same image.
    pub hash: Option<String>,
    pub status: AssetStatus,
    pub fetched_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

/// Aggregate of the `available` assets of one token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCounts {
    pub photos: u32,
    pub signatures: u32,
}
