//! Catalog lookup client (enrichment stage)
//!
//! Attaches the rights-holder label to music rows: search the catalog for
//! (track, artist), then read the label off the first match's album. Every
//! per-row failure degrades to "no label" so the stage itself never fails.

use crate::models::RecordSet;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const SPOTIFY_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "tagscout/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RATE_LIMIT_MS: u64 = 250; // courtesy spacing between catalog calls

/// Catalog client errors
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Inter-request pacing for catalog calls
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Catalog rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Catalog lookup client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(token: String) -> Result<Self, SpotifyError> {
        Self::with_base_url(token, SPOTIFY_BASE_URL.to_string())
    }

    /// Build a client against an explicit base URL (used by tests)
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            base_url,
            token,
        })
    }

    /// Attach catalog labels to every row that names a track.
    ///
    /// Rows without a music name are passed through untouched. A lookup
    /// that errors or finds nothing leaves `label: None`; the stage never
    /// aborts part-way.
    pub async fn enrich(&self, rows: RecordSet) -> RecordSet {
        let mut out = Vec::with_capacity(rows.len());

        for mut row in rows {
            if let Some(title) = row.music.clone() {
                let artist = row.music_author.clone().unwrap_or_default();
                match self.lookup_label(&title, &artist).await {
                    Ok(label) => row.label = label,
                    Err(e) => {
                        warn!(track = %title, error = %e, "Label lookup failed");
                    }
                }
            }
            out.push(row);
        }

        out
    }

    /// Find the label for one (track, artist) pair. `Ok(None)` when the
    /// catalog has no match or the album carries no label.
    pub async fn lookup_label(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<String>, SpotifyError> {
        let query = if artist.is_empty() {
            title.to_string()
        } else {
            format!("track:{} artist:{}", title, artist)
        };

        self.rate_limiter.wait().await;
        let search: Value = self
            .get_json(
                &format!("{}/search", self.base_url),
                &[("q", query.as_str()), ("type", "track"), ("limit", "1")],
            )
            .await?;

        let album_id = match search
            .pointer("/tracks/items/0/album/id")
            .and_then(Value::as_str)
        {
            Some(id) => id.to_string(),
            None => {
                debug!(track = %title, "No catalog match");
                return Ok(None);
            }
        };

        self.rate_limiter.wait().await;
        let album: Value = self
            .get_json(&format!("{}/albums/{}", self.base_url, album_id), &[])
            .await?;

        Ok(album
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, SpotifyError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }
}
