//! Signature capture detection.
//!
//! Runs before photo filtering in every preset: a signature crop is wide and
//! thin and would otherwise be dropped as a banner. The test is conjunctive so
//! that photos with an accidental 3:1 ratio are not taken for signatures.

use crate::pod::geometry::Geometry;
use common::model::photo::PhotoCandidate;

pub const SIGNATURE_KEYWORDS: &[&str] = &["signature", "firma", "sign"];

const MAX_HEIGHT: u32 = 220;
/// Below this height no keyword is needed.
const UNCORROBORATED_MAX_HEIGHT: u32 = 180;
const MIN_ASPECT_RATIO: f64 = 3.0;
const MIN_WIDTH: u32 = 300;
const MAX_WIDTH: u32 = 1200;
const MAX_PIXEL_AREA: u64 = 120_000;
const MIN_SHORT_SIDE: u32 = 120;

pub fn has_signature_keyword(candidate: &PhotoCandidate) -> bool {
    [candidate.alt.as_deref(), candidate.class_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .any(|text| SIGNATURE_KEYWORDS.iter().any(|k| text.contains(k)))
}

/// Geometric and textual part of the test. URL acceptance is left to the caller.
pub fn is_signature(candidate: &PhotoCandidate, geometry: &Geometry) -> bool {
    let shaped_like_signature = geometry.height <= MAX_HEIGHT
        && geometry.aspect_ratio >= MIN_ASPECT_RATIO
        && (MIN_WIDTH..=MAX_WIDTH).contains(&geometry.width)
        && geometry.pixel_area <= MAX_PIXEL_AREA;
    if !shaped_like_signature {
        return false;
    }

    let corroborated =
        has_signature_keyword(candidate) || geometry.height <= UNCORROBORATED_MAX_HEIGHT;

    corroborated && geometry.short_side >= MIN_SHORT_SIDE && geometry.pixel_area <= MAX_PIXEL_AREA
}
