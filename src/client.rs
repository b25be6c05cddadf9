//! Upstream wellness API client
//!
//! Read-only client for the Oura v2 REST API. One dashboard cycle performs
//! a credential check against `personal_info` followed by three concurrent
//! daily time-series fetches (sleep, activity, stress) over the trailing
//! window. The whole cycle is all-or-nothing: any rejected or failed call
//! collapses the fetch into a single error and no partial bundle is
//! surfaced.
//!
//! Parsing is deliberately permissive: unknown fields are ignored and
//! missing numeric fields default to zero, matching the upstream contract
//! of sparse daily records. A record without a parseable calendar day is
//! dropped, since nothing downstream can place it on a chart.

use chrono::{Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::UpstreamSettings;
use crate::error::ClientError;
use crate::models::{
    DailyActivityRecord, DailySleepRecord, DailyStressRecord, MetricBundle, MetricWindow,
    UserProfile,
};
use crate::token::Credential;

const PERSONAL_INFO_PATH: &str = "/v2/usercollection/personal_info";
const DAILY_SLEEP_PATH: &str = "/v2/usercollection/daily_sleep";
const DAILY_ACTIVITY_PATH: &str = "/v2/usercollection/daily_activity";
const DAILY_STRESS_PATH: &str = "/v2/usercollection/daily_stress";

/// Inclusive calendar-date range of one trailing window
///
/// Matches the reference arithmetic: start is `today - window_days`, end is
/// today.
pub fn window_range(today: NaiveDate, window_days: u32) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(window_days as i64), today)
}

/// Client for the upstream wellness API
#[derive(Debug, Clone)]
pub struct OuraClient {
    http: reqwest::Client,
    base_url: String,
    window_days: u32,
}

impl OuraClient {
    /// Build a client from upstream settings
    pub fn new(settings: &UpstreamSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(OuraClient {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            window_days: settings.window_days,
        })
    }

    /// Fetch the user profile and all three metric windows for the trailing
    /// window ending today
    ///
    /// Validates the credential first; the three data fetches then run
    /// concurrently and are only combined once all three resolve.
    #[instrument(skip_all)]
    pub async fn fetch_windows(
        &self,
        credential: &Credential,
    ) -> Result<(UserProfile, MetricBundle), ClientError> {
        let profile = self.check_credential(credential).await?;

        let (start, end) = window_range(Utc::now().date_naive(), self.window_days);
        debug!(%start, %end, "fetching metric windows");

        let (sleep, activity, stress) = tokio::try_join!(
            self.fetch_series::<DailySleepRecord>(credential, DAILY_SLEEP_PATH, start, end),
            self.fetch_series::<DailyActivityRecord>(credential, DAILY_ACTIVITY_PATH, start, end),
            self.fetch_series::<DailyStressRecord>(credential, DAILY_STRESS_PATH, start, end),
        )?;

        debug!(
            sleep_days = sleep.len(),
            activity_days = activity.len(),
            stress_days = stress.len(),
            "metric windows fetched"
        );

        Ok((
            profile,
            MetricBundle {
                sleep,
                activity,
                stress,
            },
        ))
    }

    /// Validate the credential against the personal_info endpoint
    async fn check_credential(&self, credential: &Credential) -> Result<UserProfile, ClientError> {
        let url = format!("{}{}", self.base_url, PERSONAL_INFO_PATH);
        let body = self.get_json(credential, &url).await?;
        Ok(parse_profile(&body))
    }

    /// Fetch one daily time-series over the given inclusive date range
    async fn fetch_series<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MetricWindow<T>, ClientError> {
        let url = format!(
            "{}{}?start_date={}&end_date={}",
            self.base_url, path, start, end
        );
        let body = self.get_json(credential, &url).await?;
        Ok(parse_series(&body))
    }

    /// Authenticated GET returning the parsed JSON body
    ///
    /// A non-2xx response maps to [`ClientError::Rejected`] with the
    /// upstream status and whatever error message the body carried.
    async fn get_json(&self, credential: &Credential, url: &str) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, url, "upstream rejected request");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::MalformedResponse {
                reason: e.to_string(),
            })
    }
}

/// Parse a `{ "data": [...] }` time-series body into a metric window
///
/// A missing or non-array `data` field yields an empty window; individual
/// records that fail to deserialize (typically a missing day) are dropped.
pub fn parse_series<T: DeserializeOwned>(body: &Value) -> MetricWindow<T> {
    let Some(items) = body.get("data").and_then(Value::as_array) else {
        return MetricWindow::empty();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "dropping unparseable daily record");
                None
            }
        })
        .collect()
}

/// Parse a personal_info body into a user profile
///
/// Accepts the profile either at the top level or nested under `data`;
/// unparseable bodies degrade to an empty profile rather than failing the
/// cycle, since the profile is display-only.
pub fn parse_profile(body: &Value) -> UserProfile {
    let source = match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    };
    serde_json::from_value(source.clone()).unwrap_or_default()
}

/// Best-effort error message from an upstream error body
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail from upstream".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_range_trailing_days() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let (start, end) = window_range(today, 5);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(end, today);
    }

    #[test]
    fn test_parse_series_real_shape() {
        // Trimmed daily_sleep response shape with extra fields present
        let body = json!({
            "data": [
                {
                    "id": "abc",
                    "day": "2024-06-05",
                    "score": 72,
                    "contributors": { "deep_sleep": 90 },
                    "timestamp": "2024-06-05T00:00:00+00:00"
                },
                { "day": "2024-06-06", "score": 65 }
            ],
            "next_token": null
        });
        let window: MetricWindow<DailySleepRecord> = parse_series(&body);
        assert_eq!(window.len(), 2);
        assert_eq!(window.records()[0].score, 72);
        assert_eq!(
            window.records()[1].day,
            NaiveDate::from_ymd_opt(2024, 6, 6).unwrap()
        );
    }

    #[test]
    fn test_parse_series_missing_score_defaults_to_zero() {
        let body = json!({ "data": [ { "day": "2024-06-05" } ] });
        let window: MetricWindow<DailySleepRecord> = parse_series(&body);
        assert_eq!(window.records()[0].score, 0);
    }

    #[test]
    fn test_parse_series_drops_record_without_day() {
        let body = json!({
            "data": [
                { "score": 80 },
                { "day": "2024-06-06", "score": 65 }
            ]
        });
        let window: MetricWindow<DailySleepRecord> = parse_series(&body);
        assert_eq!(window.len(), 1);
        assert_eq!(window.records()[0].score, 65);
    }

    #[test]
    fn test_parse_series_missing_data_field_is_empty_window() {
        let body = json!({ "detail": "no data in range" });
        let window: MetricWindow<DailyActivityRecord> = parse_series(&body);
        assert!(window.is_empty());
    }

    #[test]
    fn test_parse_stress_series() {
        let body = json!({
            "data": [
                { "day": "2024-06-05", "stress_high": 9000, "recovery_high": 1200 },
                { "day": "2024-06-06" }
            ]
        });
        let window: MetricWindow<DailyStressRecord> = parse_series(&body);
        assert_eq!(window.records()[0].stress_high, 9000);
        assert_eq!(window.records()[1].stress_high, 0);
    }

    #[test]
    fn test_parse_profile_top_level() {
        let body = json!({ "id": "u1", "age": 31, "weight": 70.5, "height": 1.8 });
        let profile = parse_profile(&body);
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.age, Some(31));
    }

    #[test]
    fn test_parse_profile_nested_under_data() {
        let body = json!({ "data": { "id": "u2", "age": 28 } });
        let profile = parse_profile(&body);
        assert_eq!(profile.id, "u2");
    }

    #[test]
    fn test_parse_profile_garbage_degrades_to_default() {
        let profile = parse_profile(&json!([1, 2, 3]));
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"error": "invalid token"}"#),
            "invalid token"
        );
        assert_eq!(
            extract_error_message(r#"{"detail": "rate limited"}"#),
            "rate limited"
        );
        assert_eq!(extract_error_message("  plain text  "), "plain text");
        assert_eq!(extract_error_message(""), "no error detail from upstream");
    }
}
