use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Consignment fields the quality score depends on, as delivered by the carrier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryMetadata {
    /// Carrier reported a captured signature.
    pub has_signature: bool,
    /// Name typed in by the person who signed for the goods.
    pub receiver_name: Option<String>,
    /// Free text such as `Frozen -18C to -20C` or `+14°C`.
    pub expected_temperature: Option<String>,
    /// Raw values of every field the carrier uses to carry a temperature
    /// reading. `999` means "no reading".
    pub temperature_readings: Vec<String>,
    pub tracking_link: Option<String>,
    pub delivery_time: Option<DateTime<Utc>>,
}

/// Inputs of the rule table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreInput {
    pub photo_count: u32,
    pub has_signature: bool,
    pub has_receiver_name: bool,
    pub temperature_compliant: bool,
}

/// One line of the rule table and the points it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub rule: String,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Always within `0..=100`.
    pub quality_score: u8,
    pub breakdown: Vec<ScoreComponent>,
}

/// Proof-of-delivery summary of one consignment, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMetrics {
    pub photo_count: u32,
    pub has_signature: bool,
    pub temperature_compliant: bool,
    pub has_tracking_link: bool,
    pub delivery_time: Option<DateTime<Utc>>,
    pub quality_score: u8,
    pub has_receiver_name: bool,
    pub breakdown: Vec<ScoreComponent>,
}
