use std::sync::Arc;

use anyhow::Context;
use log::{debug, warn};
use reqwest::StatusCode;

use crate::core::response::SiteCheckResponse;
use crate::http::HttpClient;

/// Public SiteCheck v3 endpoint.
pub const DEFAULT_API_URL: &str = "https://sitecheck.sucuri.net/api/v3/";

/// What a single SiteCheck lookup produced.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The API answered with something other than 200.
    Failed(u16),
    /// The API ran but reported a scan-level error for the site.
    ScanError(String),
    Report(Box<SiteCheckResponse>),
}

/// Stateless client for the SiteCheck API: one GET per lookup.
pub struct SiteCheckClient {
    http: Arc<HttpClient>,
    api_url: String,
}

impl SiteCheckClient {
    pub fn new(http: Arc<HttpClient>, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    /// Issues `GET <api_url>?scan=<site>` and classifies the answer.
    ///
    /// Transport and decode failures are returned as errors; a non-200
    /// status is a regular `Failed` outcome.
    pub async fn check(&self, site: &str) -> anyhow::Result<CheckOutcome> {
        debug!("Querying {} for {}", self.api_url, site);

        let response = self
            .http
            .get_with_query(&self.api_url, &[("scan", site)])
            .await
            .with_context(|| format!("request to {} failed", self.api_url))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("SiteCheck returned status {} for {}", status, site);
            return Ok(CheckOutcome::Failed(status.as_u16()));
        }

        let body: SiteCheckResponse = response
            .json()
            .await
            .context("failed to decode SiteCheck response")?;

        if let Some(error) = body.scan_error() {
            debug!("SiteCheck scan error for {}: {}", site, error);
            return Ok(CheckOutcome::ScanError(error.to_string()));
        }

        Ok(CheckOutcome::Report(Box::new(body)))
    }
}
