//! Retrieval of tracking pages and asset bytes.
//!
//! Everything here is blocking and meant to run inside `spawn_blocking`, the
//! same way the extraction job runs its database work.

use crate::error::{Error, Result};
use log::debug;
use std::sync::OnceLock;
use std::time::Duration;

/// Source of tracking page HTML and image bytes.
pub trait TrackingPageSource: Send + Sync {
    fn fetch_html(&self, url: &str) -> Result<String>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP implementation backed by a blocking `reqwest` client.
///
/// The client is built on first use so that it is created on a blocking
/// worker thread rather than inside the async runtime.
pub struct HttpPageSource {
    timeout: Duration,
    user_agent: String,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        debug!("GET {}", url);
        let response = self.client()?.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned {}", url, status)));
        }
        Ok(response)
    }
}

impl TrackingPageSource for HttpPageSource {
    fn fetch_html(&self, url: &str) -> Result<String> {
        Ok(self.get(url)?.text()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get(url)?.bytes()?.to_vec())
    }
}
