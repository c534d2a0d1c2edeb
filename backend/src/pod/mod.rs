//! Proof-of-delivery photo filter engine.
//!
//! Everything here is pure and synchronous: no I/O, no shared state. The
//! service and job layers call into it and own persistence and fetching.

pub mod classifier;
pub mod extractor;
pub mod geometry;
pub mod html;
pub mod policy;
pub mod scoring;
pub mod signature;
pub mod temperature;
pub mod url_validator;

pub use extractor::{
    extract_full_resolution, extract_thumbnails, filter_and_classify_photos,
    filter_fetchable_photos,
};
pub use scoring::{evaluate, score};
pub use url_validator::is_valid_photo_url;
