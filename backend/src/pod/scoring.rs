//! Proof-of-delivery quality score.
//!
//! | rule                | points                                 |
//! |---------------------|----------------------------------------|
//! | photos              | >=3: +25, 2: -10, 1: -20, 0: -50        |
//! | signature present   | +25                                    |
//! | receiver name       | +25                                    |
//! | temperature         | +25 when compliant                     |
//!
//! The sum is clamped to `0..=100`.

use crate::pod::temperature::{collect_readings, is_temperature_compliant};
use common::model::asset::AssetCounts;
use common::model::metrics::{DeliveryMetadata, PodMetrics, ScoreComponent, ScoreInput, ScoreResult};

const RULE_POINTS: i32 = 25;

pub fn photo_points(photo_count: u32) -> i32 {
    match photo_count {
        0 => -50,
        1 => -20,
        2 => -10,
        _ => RULE_POINTS,
    }
}

fn component(rule: &str, points: i32) -> ScoreComponent {
    ScoreComponent {
        rule: rule.to_string(),
        points,
    }
}

fn points_if(condition: bool) -> i32 {
    if condition { RULE_POINTS } else { 0 }
}

pub fn score(input: &ScoreInput) -> ScoreResult {
    let breakdown = vec![
        component("photos", photo_points(input.photo_count)),
        component("signature", points_if(input.has_signature)),
        component("receiver_name", points_if(input.has_receiver_name)),
        component("temperature", points_if(input.temperature_compliant)),
    ];
    let total: i32 = breakdown.iter().map(|c| c.points).sum();

    ScoreResult {
        quality_score: total.clamp(0, 100) as u8,
        breakdown,
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Full metrics of a consignment from its stored asset counts and carrier fields.
pub fn evaluate(counts: AssetCounts, metadata: &DeliveryMetadata) -> PodMetrics {
    let readings = collect_readings(&metadata.temperature_readings);
    let input = ScoreInput {
        photo_count: counts.photos,
        has_signature: metadata.has_signature || counts.signatures > 0,
        has_receiver_name: is_present(metadata.receiver_name.as_deref()),
        temperature_compliant: is_temperature_compliant(
            metadata.expected_temperature.as_deref(),
            &readings,
        ),
    };
    let result = score(&input);

    PodMetrics {
        photo_count: input.photo_count,
        has_signature: input.has_signature,
        temperature_compliant: input.temperature_compliant,
        has_tracking_link: is_present(metadata.tracking_link.as_deref()),
        delivery_time: metadata.delivery_time,
        quality_score: result.quality_score,
        has_receiver_name: input.has_receiver_name,
        breakdown: result.breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(photo_count: u32, flags: bool) -> ScoreInput {
        ScoreInput {
            photo_count,
            has_signature: flags,
            has_receiver_name: flags,
            temperature_compliant: flags,
        }
    }

    #[test]
    fn nothing_scores_zero() {
        assert_eq!(score(&input(0, false)).quality_score, 0);
    }

    #[test]
    fn everything_scores_hundred() {
        let result = score(&input(5, true));
        assert_eq!(result.quality_score, 100);
        assert_eq!(result.breakdown.len(), 4);
    }

    #[test]
    fn photo_penalties() {
        assert_eq!(score(&input(1, true)).quality_score, 55);
        assert_eq!(score(&input(2, true)).quality_score, 65);
        assert_eq!(score(&input(3, false)).quality_score, 25);
        // -50 + 25 floors at zero
        let only_signature = ScoreInput {
            has_signature: true,
            ..ScoreInput::default()
        };
        assert_eq!(score(&only_signature).quality_score, 0);
    }

    #[test]
    fn evaluate_derives_flags_from_metadata_and_assets() {
        let metadata = DeliveryMetadata {
            has_signature: false,
            receiver_name: Some("  J. Smith ".to_string()),
            expected_temperature: Some("Frozen -18C to -20C".to_string()),
            temperature_readings: vec!["999".to_string(), "-19".to_string()],
            tracking_link: Some("https://tracking.axylog.com/ABC".to_string()),
            delivery_time: None,
        };
        let metrics = evaluate(AssetCounts { photos: 3, signatures: 1 }, &metadata);
        assert!(metrics.has_signature);
        assert!(metrics.has_receiver_name);
        assert!(metrics.temperature_compliant);
        assert!(metrics.has_tracking_link);
        assert_eq!(metrics.quality_score, 100);
    }

    #[test]
    fn blank_receiver_name_does_not_count() {
        let metadata = DeliveryMetadata {
            receiver_name: Some("   ".to_string()),
            expected_temperature: Some("2-8°C".to_string()),
            temperature_readings: vec!["12".to_string()],
            ..DeliveryMetadata::default()
        };
        let metrics = evaluate(AssetCounts { photos: 4, signatures: 0 }, &metadata);
        assert!(!metrics.has_receiver_name);
        assert!(!metrics.temperature_compliant);
        assert!(!metrics.has_signature);
        assert_eq!(metrics.quality_score, 25);
    }
}
