//! Proof-of-delivery photo extraction and quality scoring for ChillTrack.
//!
//! `pod` holds the pure filter engine; the other modules wire it to SQLite,
//! the carrier's tracking pages and an HTTP API.

pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod job_controller;
pub mod pod;
pub mod services;
