//! FedEx OAuth and tracking client.
//!
//! Status lookups use `includeDetailedScans=false`; delivery-date lookups use
//! `includeDetailedScans=true` and prefer the actual delivery timestamp over
//! the end of the estimated delivery window. Timestamps are converted to the
//! display timezone before formatting, and the formatted string is truncated
//! to the width of the destination column.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use labtrack_core::{AppError, FedExConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::token::TokenCache;
use crate::{Lookup, TrackingProvider};

/// Timezone used for all displayed delivery times.
pub const DISPLAY_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Width of the `expected_delivery_date` column. Truncation is applied to the
/// already-formatted string, never by limiting precision first.
pub const MAX_DELIVERY_DATE_LEN: usize = 30;

const ACTUAL_DELIVERY: &str = "ACTUAL_DELIVERY";

/// Client for the FedEx OAuth and tracking endpoints.
///
/// Holds the injected token cache; a cached token is reused until it expires,
/// and a failed exchange leaves the cache unchanged.
#[derive(Clone)]
pub struct FedExClient {
    http: Client,
    config: FedExConfig,
    tokens: Arc<TokenCache>,
}

impl FedExClient {
    pub fn new(config: FedExConfig, tokens: Arc<TokenCache>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client for FedEx")?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Return a cached bearer token, or perform a client-credentials exchange
    /// and cache the result. No retry or backoff on failure.
    async fn access_token(&self) -> Result<String, AppError> {
        if let Some(token) = self.tokens.fresh(Utc::now()).await {
            return Ok(token);
        }

        let response = self
            .http
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::CarrierAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::CarrierAuth(format!(
                "Token exchange returned {}",
                response.status()
            )));
        }

        let body: OauthTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::CarrierAuth(format!("Invalid token response: {}", e)))?;

        self.tokens
            .store(body.access_token.clone(), body.expires_in, Utc::now())
            .await;

        Ok(body.access_token)
    }

    /// POST one tracking number to the tracking endpoint and extract the
    /// first track result. Transport and HTTP failures become `Unavailable`;
    /// a well-formed reply with no result is `NotFound`.
    #[tracing::instrument(skip(self), fields(carrier = "FedEx"))]
    async fn track(
        &self,
        tracking_number: &str,
        include_detailed_scans: bool,
    ) -> Result<Lookup<TrackResult>, AppError> {
        let token = self.access_token().await?;

        let request = TrackRequest {
            tracking_info: vec![TrackingInfo {
                tracking_number_info: TrackingNumberInfo { tracking_number },
            }],
            include_detailed_scans,
        };

        let response = match self
            .http
            .post(self.config.tracking_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(tracking_number, error = %e, "FedEx tracking request failed");
                return Ok(Lookup::Unavailable);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                tracking_number,
                status = %response.status(),
                "FedEx tracking request rejected"
            );
            return Ok(Lookup::Unavailable);
        }

        let reply: TrackReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(tracking_number, error = %e, "FedEx tracking reply unreadable");
                return Ok(Lookup::Unavailable);
            }
        };

        Ok(first_track_result(reply))
    }
}

#[async_trait]
impl TrackingProvider for FedExClient {
    async fn status(&self, tracking_number: &str) -> Result<Lookup<String>, AppError> {
        let lookup = self.track(tracking_number, false).await?;
        Ok(lookup.and_then(|result| match extract_status(&result) {
            Some(status) => Lookup::Found(status),
            None => Lookup::NotFound,
        }))
    }

    async fn expected_delivery(
        &self,
        tracking_number: &str,
    ) -> Result<Lookup<DateTime<Tz>>, AppError> {
        let lookup = self.track(tracking_number, true).await?;
        Ok(lookup.and_then(|result| match extract_delivery(&result) {
            Some(delivered_at) => Lookup::Found(delivered_at),
            None => Lookup::NotFound,
        }))
    }
}

/// RFC 3339 rendering of a delivery time, truncated to the column width.
pub fn format_delivery_date(delivered_at: DateTime<Tz>) -> String {
    let formatted = delivered_at.to_rfc3339();
    formatted.chars().take(MAX_DELIVERY_DATE_LEN).collect()
}

fn first_track_result(reply: TrackReply) -> Lookup<TrackResult> {
    let result = reply
        .output
        .and_then(|output| output.complete_track_results.into_iter().next())
        .and_then(|complete| complete.track_results.into_iter().next());
    match result {
        Some(result) => Lookup::Found(result),
        None => Lookup::NotFound,
    }
}

fn extract_status(result: &TrackResult) -> Option<String> {
    result
        .latest_status_detail
        .as_ref()
        .and_then(|detail| detail.description.clone())
}

/// Choose the delivery timestamp: actual delivery wins over the estimated
/// window end. Returns the time converted to the display timezone.
fn extract_delivery(result: &TrackResult) -> Option<DateTime<Tz>> {
    let actual = result
        .date_and_times
        .iter()
        .find(|entry| entry.kind.as_deref() == Some(ACTUAL_DELIVERY))
        .and_then(|entry| entry.date_time.as_deref());

    let estimated = result
        .estimated_delivery_time_window
        .as_ref()
        .and_then(|estimate| estimate.window.as_ref())
        .and_then(|window| window.ends.as_deref());

    let raw = actual.or(estimated)?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&DISPLAY_TZ)),
        Err(e) => {
            tracing::warn!(raw, error = %e, "Unparseable FedEx delivery timestamp");
            None
        }
    }
}

// ----- Wire types -----

#[derive(Debug, Deserialize)]
struct OauthTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackRequest<'a> {
    tracking_info: Vec<TrackingInfo<'a>>,
    include_detailed_scans: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingInfo<'a> {
    tracking_number_info: TrackingNumberInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingNumberInfo<'a> {
    tracking_number: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TrackReply {
    output: Option<TrackOutput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TrackOutput {
    complete_track_results: Vec<CompleteTrackResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CompleteTrackResult {
    track_results: Vec<TrackResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TrackResult {
    latest_status_detail: Option<StatusDetail>,
    date_and_times: Vec<DateAndTime>,
    estimated_delivery_time_window: Option<EstimatedWindow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatusDetail {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DateAndTime {
    #[serde(rename = "type")]
    kind: Option<String>,
    date_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EstimatedWindow {
    window: Option<TimeWindow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TimeWindow {
    ends: Option<String>,
}
