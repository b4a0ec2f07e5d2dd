//! Scrape job API client
//!
//! Submits a hashtag scrape run to the job service, waits for the dataset
//! behind the run handle to become ready, and normalizes every returned
//! record. Submission failures fail fast; dataset readiness is the only
//! thing retried, by polling at a fixed interval within a total budget.
//! A budget that expires is an empty result, not an error.

use crate::models::RecordSet;
use crate::services::normalizer::normalize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

const APIFY_BASE_URL: &str = "https://api.apify.com";
const HASHTAG_ACTOR: &str = "clockworks~tiktok-hashtag-scraper";
const USER_AGENT: &str = "tagscout/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Scrape client errors
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Scrape job API client
pub struct ApifyClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    poll_interval: Duration,
    poll_budget: Duration,
}

impl ApifyClient {
    /// Build a client against the production service. The token is used
    /// as-is; an empty token surfaces as the service's 401 on first use.
    pub fn new(
        token: String,
        poll_interval: Duration,
        poll_budget: Duration,
    ) -> Result<Self, ApifyError> {
        Self::with_base_url(token, APIFY_BASE_URL.to_string(), poll_interval, poll_budget)
    }

    /// Build a client against an explicit base URL (used by tests)
    pub fn with_base_url(
        token: String,
        base_url: String,
        poll_interval: Duration,
        poll_budget: Duration,
    ) -> Result<Self, ApifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            token,
            poll_interval,
            poll_budget,
        })
    }

    /// Fetch and normalize all records for one hashtag.
    ///
    /// Returns `Ok(vec![])` when the dataset never becomes ready within the
    /// poll budget; only submission and handle-extraction failures are `Err`.
    pub async fn fetch_hashtag(&self, tag: &str, limit: u32) -> Result<RecordSet, ApifyError> {
        let tag = normalize_tag(tag);

        info!(tag = %tag, limit = limit, "Submitting hashtag scrape run");
        let run = self.submit_run(&tag, limit).await?;

        let dataset_id = run
            .pointer("/data/defaultDatasetId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApifyError::Parse("run response missing data.defaultDatasetId".to_string())
            })?
            .to_string();
        debug!(dataset_id = %dataset_id, "Run submitted, polling dataset");

        let items = self.poll_dataset(&dataset_id).await;
        info!(records = items.len(), "Dataset retrieval finished");

        Ok(items.iter().map(normalize).collect())
    }

    /// Submit the actor run, blocking for initial synchronous completion
    /// (`?wait=1`). Non-2xx fails fast with the response body attached.
    async fn submit_run(&self, tag: &str, limit: u32) -> Result<Value, ApifyError> {
        let url = format!("{}/v2/acts/{}/runs?wait=1", self.base_url, HASHTAG_ACTOR);
        let payload = json!({
            "hashtags": [tag],
            "maxItems": limit,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApifyError::Parse(e.to_string()))
    }

    /// Poll the dataset until it yields records or the budget runs out.
    /// An errored poll counts as not-ready and polling continues.
    async fn poll_dataset(&self, dataset_id: &str) -> Vec<Value> {
        let start = Instant::now();

        loop {
            match self.dataset_items(dataset_id).await {
                Ok(items) if !items.is_empty() => return items,
                Ok(_) => debug!(dataset_id = %dataset_id, "Dataset not ready yet"),
                Err(e) => warn!(dataset_id = %dataset_id, error = %e, "Dataset poll failed"),
            }

            if !another_poll_fits(start.elapsed(), self.poll_interval, self.poll_budget) {
                warn!(
                    dataset_id = %dataset_id,
                    budget_secs = self.poll_budget.as_secs(),
                    "Dataset never became ready within poll budget"
                );
                return Vec::new();
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ApifyError> {
        let url = format!("{}/v2/datasets/{}/items?format=json", self.base_url, dataset_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApifyError::Parse(e.to_string()))
    }
}

/// Trim whitespace and strip one leading `#`.
pub fn normalize_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).to_string()
}

/// The next poll happens only if a full interval still fits strictly inside
/// the budget. With a 10 s interval and a 300 s budget this permits polls at
/// t = 0..=290, so a dataset that becomes ready on poll 30 is retrieved.
fn another_poll_fits(elapsed: Duration, interval: Duration, budget: Duration) -> bool {
    elapsed + interval < budget
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_trimmed_and_unhashed() {
        assert_eq!(normalize_tag("  #techno  "), "techno");
        assert_eq!(normalize_tag("techno"), "techno");
        assert_eq!(normalize_tag("##techno"), "#techno"); // one leading # only
        assert_eq!(normalize_tag("   "), "");
    }

    #[test]
    fn poll_fits_strictly_inside_budget() {
        let interval = Duration::from_secs(10);
        let budget = Duration::from_secs(300);

        // After the poll at t=280 another interval still fits (290 < 300).
        assert!(another_poll_fits(Duration::from_secs(280), interval, budget));
        // After the poll at t=290 it does not (290 + 10 == 300).
        assert!(!another_poll_fits(Duration::from_secs(290), interval, budget));
    }

    #[test]
    fn zero_budget_never_sleeps() {
        assert!(!another_poll_fits(
            Duration::ZERO,
            Duration::from_secs(10),
            Duration::ZERO
        ));
    }

    #[test]
    fn client_creation() {
        let client = ApifyClient::new(
            "test-token".to_string(),
            Duration::from_secs(10),
            Duration::from_secs(300),
        );
        assert!(client.is_ok());
    }
}
