//! Entry points used by the service layer and the extraction jobs.

use crate::pod::classifier::classify;
use crate::pod::policy::PhotoFilterPolicy;
use common::model::photo::{FilteredPhoto, PhotoCandidate};
use common::requests::ExtractionTier;
use std::collections::HashSet;
use url::Url;

pub fn extract_thumbnails(candidates: &[PhotoCandidate]) -> Vec<FilteredPhoto> {
    classify(candidates, &PhotoFilterPolicy::thumbnail())
}

pub fn extract_full_resolution(candidates: &[PhotoCandidate]) -> Vec<FilteredPhoto> {
    classify(candidates, &PhotoFilterPolicy::full_resolution())
}

/// Single-tier filter kept for callers that still expect the first revision.
pub fn filter_and_classify_photos(candidates: &[PhotoCandidate]) -> Vec<FilteredPhoto> {
    classify(candidates, &PhotoFilterPolicy::legacy())
}

pub fn extract(candidates: &[PhotoCandidate], tier: ExtractionTier) -> Vec<FilteredPhoto> {
    match tier {
        ExtractionTier::Thumbnail => extract_thumbnails(candidates),
        ExtractionTier::FullResolution => extract_full_resolution(candidates),
        ExtractionTier::Legacy => filter_and_classify_photos(candidates),
    }
}

/// Deduplicates and keeps only `http`/`https` URLs, for pages that do not
/// declare image dimensions. No size or host rules are applied.
///
/// Idempotent: feeding the output back in returns it unchanged.
pub fn filter_fetchable_photos(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| is_fetchable(url))
        .filter(|url| seen.insert(url.to_string()))
        .map(str::to_string)
        .collect()
}

fn is_fetchable(url: &str) -> bool {
    !url.is_empty()
        && Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}
