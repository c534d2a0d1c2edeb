//! Per-candidate classification into photos and signatures.
//!
//! Every candidate is judged on its own, output keeps input order and a
//! rejected candidate is simply absent from the result. Scraped pages are
//! noisy, so dropping is the normal case and never an error.

use crate::pod::geometry::Geometry;
use crate::pod::policy::{BrandExclusion, PhotoFilterPolicy};
use crate::pod::signature::is_signature;
use crate::pod::url_validator::validate_photo_url;
use common::model::photo::{FilteredPhoto, PhotoCandidate, PhotoKind};
use log::debug;

const MIN_DIMENSION: u32 = 50;
/// Squares up to this size are placeholder tiles.
const MAX_PLACEHOLDER_SQUARE: u32 = 200;

const LOADING_MARKERS: &[&str] = &["loading", "spinner", "placeholder", "blank.gif", "lazy.gif"];

pub const BRAND_KEYWORDS: &[&str] = &["logo", "brand", "chilltrack", "chill-track"];

pub fn classify(candidates: &[PhotoCandidate], policy: &PhotoFilterPolicy) -> Vec<FilteredPhoto> {
    let kept: Vec<FilteredPhoto> = candidates
        .iter()
        .filter_map(|candidate| classify_one(candidate, policy))
        .collect();
    debug!(
        "{} filter kept {} of {} candidates",
        policy.name,
        kept.len(),
        candidates.len()
    );
    kept
}

pub fn classify_one(candidate: &PhotoCandidate, policy: &PhotoFilterPolicy) -> Option<FilteredPhoto> {
    if is_noise(candidate, policy.brand_exclusion) {
        return None;
    }

    let geometry = Geometry::of(candidate.width, candidate.height);
    if geometry.width == geometry.height && geometry.width <= MAX_PLACEHOLDER_SQUARE {
        return None;
    }

    let url = candidate.src.trim();
    let kind = if is_signature(candidate, &geometry) {
        PhotoKind::Signature
    } else if policy.admits_photo(&geometry) {
        PhotoKind::Photo
    } else {
        return None;
    };

    if !validate_photo_url(url, policy.accept_data_uris) {
        return None;
    }

    Some(FilteredPhoto {
        url: url.to_string(),
        kind,
        width: candidate.width,
        height: candidate.height,
        is_thumbnail: policy.thumbnail_flag,
    })
}

fn is_noise(candidate: &PhotoCandidate, brand_exclusion: BrandExclusion) -> bool {
    candidate.width < MIN_DIMENSION
        || candidate.height < MIN_DIMENSION
        || candidate.src.trim().is_empty()
        || is_decoration(candidate, brand_exclusion)
}

/// Loading placeholders and brand images, judged without any size
/// information.
pub fn is_decoration(candidate: &PhotoCandidate, brand_exclusion: BrandExclusion) -> bool {
    let src = candidate.src.trim().to_lowercase();
    if LOADING_MARKERS.iter().any(|m| src.contains(m)) {
        return true;
    }

    let text_is_brand = [candidate.alt.as_deref(), candidate.class_name.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| contains_brand(text));
    let src_is_brand = brand_exclusion == BrandExclusion::Everywhere && contains_brand(&src);

    text_is_brand || src_is_brand
}

fn contains_brand(text: &str) -> bool {
    let text = text.to_lowercase();
    BRAND_KEYWORDS.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = "https://foo.blob.core.windows.net/pod/x.jpg";

    fn full() -> PhotoFilterPolicy {
        PhotoFilterPolicy::full_resolution()
    }

    #[test]
    fn blob_photo_survives() {
        let out = classify(&[PhotoCandidate::new(BLOB, 768, 1024)], &full());
        assert_eq!(
            out,
            vec![FilteredPhoto {
                url: BLOB.to_string(),
                kind: PhotoKind::Photo,
                width: 768,
                height: 1024,
                is_thumbnail: Some(false),
            }]
        );
    }

    #[test]
    fn tiny_and_empty_candidates_are_dropped() {
        let candidates = vec![
            PhotoCandidate::new(BLOB, 49, 1024),
            PhotoCandidate::new(BLOB, 1024, 10),
            PhotoCandidate::new("  ", 768, 1024),
        ];
        assert!(classify(&candidates, &full()).is_empty());
    }

    #[test]
    fn loading_placeholders_and_brand_images_are_dropped() {
        let candidates = vec![
            PhotoCandidate::new("https://foo.blob.core.windows.net/loading.gif", 768, 1024),
            PhotoCandidate::new(BLOB, 768, 1024).with_alt("ChillTrack Logo"),
            PhotoCandidate::new(BLOB, 768, 1024).with_class("brand-header"),
        ];
        assert!(classify(&candidates, &full()).is_empty());
    }

    #[test]
    fn small_squares_are_placeholder_tiles() {
        let out = classify(&[PhotoCandidate::new(BLOB, 200, 200)], &PhotoFilterPolicy::thumbnail());
        assert!(out.is_empty());
        let out = classify(&[PhotoCandidate::new(BLOB, 201, 201)], &PhotoFilterPolicy::thumbnail());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn signature_is_detected_before_banner_rejection() {
        let sig = PhotoCandidate::new("https://foo.blob.core.windows.net/sig", 600, 150);
        let out = classify(&[sig], &full());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, PhotoKind::Signature);
    }

    #[test]
    fn output_keeps_input_order() {
        let candidates = vec![
            PhotoCandidate::new("https://foo.blob.core.windows.net/a", 1024, 768),
            PhotoCandidate::new("https://foo.blob.core.windows.net/tiny", 10, 10),
            PhotoCandidate::new("https://foo.blob.core.windows.net/sig", 600, 150),
            PhotoCandidate::new("https://foo.blob.core.windows.net/b", 768, 1024),
        ];
        let urls: Vec<_> = classify(&candidates, &full())
            .into_iter()
            .map(|p| p.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://foo.blob.core.windows.net/a",
                "https://foo.blob.core.windows.net/sig",
                "https://foo.blob.core.windows.net/b",
            ]
        );
    }

    #[test]
    fn rejected_url_drops_geometrically_valid_photo() {
        let out = classify(
            &[PhotoCandidate::new("http://example.com/photo.jpg", 768, 1024)],
            &full(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn decoration_ignores_size() {
        let spinner = PhotoCandidate::new("https://foo.blob.core.windows.net/spinner.gif", 0, 0);
        let branded = PhotoCandidate::new(BLOB, 0, 0).with_class("site-logo");
        let plain = PhotoCandidate::new(BLOB, 0, 0);
        assert!(is_decoration(&spinner, BrandExclusion::TextOnly));
        assert!(is_decoration(&branded, BrandExclusion::TextOnly));
        assert!(!is_decoration(&plain, BrandExclusion::Everywhere));
    }

    #[test]
    fn data_uri_signature_only_survives_legacy() {
        let sig = PhotoCandidate::new("data:image/png;base64,AAAA", 600, 150).with_alt("signature");
        assert!(classify(std::slice::from_ref(&sig), &full()).is_empty());
        let out = classify(&[sig], &PhotoFilterPolicy::legacy());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, PhotoKind::Signature);
        assert_eq!(out[0].is_thumbnail, None);
    }
}
