pub mod asset;
pub mod metrics;
pub mod photo;
