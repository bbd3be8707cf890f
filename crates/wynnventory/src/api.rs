//! REST API client for the wynnventory.com pool endpoints.
//!
//! Wraps the authenticated `GET` endpoints for current and historical pool
//! rotations using [`reqwest`].

use std::time::Duration;

use serde::Deserialize;
use wynnpool_core::error::CoreError;
use wynnpool_core::pool::{PoolKind, ReportedWindow};
use wynnpool_core::window::PoolWindow;

use crate::config::WynnventoryConfig;

/// HTTP client for the wynnventory pool API.
pub struct WynnventoryApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Body returned by every pool endpoint.
///
/// Weekly pools carry `regions`, the daily pool carries `gambits`; either
/// may be missing or `null` while a rotation is still being published.
#[derive(Debug, Deserialize)]
pub struct PoolResponse {
    #[serde(default, alias = "gambits")]
    pub regions: Option<Vec<serde_json::Value>>,
    #[serde(flatten)]
    pub window: ReportedWindow,
}

/// Errors from the wynnventory REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum WynnventoryError {
    /// No API key configured; nothing was sent.
    #[error("WYNNVENTORY_API_KEY is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// wynnventory returned a non-2xx status code.
    #[error("wynnventory API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The upstream has no endpoint for this request.
    #[error("Unsupported request: {0}")]
    Unsupported(String),
}

impl From<WynnventoryError> for CoreError {
    fn from(err: WynnventoryError) -> Self {
        match err {
            WynnventoryError::MissingApiKey => CoreError::Configuration(err.to_string()),
            WynnventoryError::Unsupported(msg) => CoreError::Validation(msg),
            WynnventoryError::Request(_) | WynnventoryError::ApiError { .. } => {
                CoreError::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

impl WynnventoryApi {
    /// Create a client from configuration, applying its request timeout.
    pub fn new(config: &WynnventoryConfig) -> Result<Self, WynnventoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.api_key.clone(),
        ))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the rotation currently live upstream.
    pub async fn get_current(&self, kind: PoolKind) -> Result<PoolResponse, WynnventoryError> {
        self.get(current_path(kind)).await
    }

    /// Fetch a past (or current) rotation by window.
    pub async fn get_window(
        &self,
        kind: PoolKind,
        window: &PoolWindow,
    ) -> Result<PoolResponse, WynnventoryError> {
        let path = window_path(kind, window)?;
        self.get(&path).await
    }

    // ---- private helpers ----

    async fn get(&self, path: &str) -> Result<PoolResponse, WynnventoryError> {
        let api_key = self.api_key.as_deref().ok_or(WynnventoryError::MissingApiKey)?;
        let url = format!("{}/{path}", self.base_url);

        tracing::debug!(%url, "Requesting wynnventory pool");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Api-Key {api_key}"))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<PoolResponse>().await?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`WynnventoryError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, WynnventoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WynnventoryError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn current_path(kind: PoolKind) -> &'static str {
    match kind {
        PoolKind::Lootrun => "lootpool/current",
        PoolKind::Raidpool => "raidpool/current",
        PoolKind::Gambits => "raidpool/gambits/current",
    }
}

fn window_path(kind: PoolKind, window: &PoolWindow) -> Result<String, WynnventoryError> {
    match (kind, window) {
        (PoolKind::Lootrun, PoolWindow::Week(w)) => Ok(format!("lootpool/{}/{}", w.year, w.week)),
        (PoolKind::Raidpool, PoolWindow::Week(w)) => Ok(format!("raidpool/{}/{}", w.year, w.week)),
        _ => Err(WynnventoryError::Unsupported(format!(
            "no upstream endpoint for {kind} window {window}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wynnpool_core::window::{DayWindow, WeekWindow};

    #[test]
    fn current_paths() {
        assert_eq!(current_path(PoolKind::Lootrun), "lootpool/current");
        assert_eq!(current_path(PoolKind::Raidpool), "raidpool/current");
        assert_eq!(current_path(PoolKind::Gambits), "raidpool/gambits/current");
    }

    #[test]
    fn window_paths() {
        let w = PoolWindow::Week(WeekWindow::new(2024, 39));
        assert_eq!(window_path(PoolKind::Lootrun, &w).unwrap(), "lootpool/2024/39");
        assert_eq!(window_path(PoolKind::Raidpool, &w).unwrap(), "raidpool/2024/39");
    }

    #[test]
    fn gambit_history_is_unsupported() {
        let d = PoolWindow::Day(DayWindow::new(2024, 9, 6));
        assert!(matches!(
            window_path(PoolKind::Gambits, &d),
            Err(WynnventoryError::Unsupported(_))
        ));
    }

    #[test]
    fn response_accepts_regions_or_gambits() {
        let weekly: PoolResponse =
            serde_json::from_str(r#"{ "regions": [{}, {}], "year": 2025, "week": 3 }"#).unwrap();
        assert_eq!(weekly.regions.map(|r| r.len()), Some(2));
        assert_eq!(weekly.window.week, Some(3));

        let daily: PoolResponse = serde_json::from_str(
            r#"{ "gambits": [{}, {}, {}, {}], "year": 2025, "month": 3, "day": 9 }"#,
        )
        .unwrap();
        assert_eq!(daily.regions.map(|r| r.len()), Some(4));
        assert_eq!(daily.window.day, Some(9));
    }

    #[test]
    fn response_tolerates_null_and_missing_fields() {
        let empty: PoolResponse = serde_json::from_str(r#"{ "regions": null }"#).unwrap();
        assert!(empty.regions.is_none());
        assert_eq!(empty.window, ReportedWindow::default());

        let bare: PoolResponse = serde_json::from_str("{}").unwrap();
        assert!(bare.regions.is_none());
    }

    #[test]
    fn errors_map_to_core_taxonomy() {
        assert!(matches!(
            CoreError::from(WynnventoryError::MissingApiKey),
            CoreError::Configuration(_)
        ));
        assert!(matches!(
            CoreError::from(WynnventoryError::ApiError {
                status: 503,
                body: "maintenance".into()
            }),
            CoreError::UpstreamUnavailable(_)
        ));
    }
}
