//! SerpApi client for the Google Jobs engine.
//!
//! Two endpoints are used: `/account` for the remaining search credits and
//! `/search.json` for the per-role job searches.

use crate::error::{mentions_quota, QuotaLookupError, SearchError};
use crate::traits::SearchProvider;
use common::{JobPosting, RoleQuery};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const BASE_URL: &str = "https://serpapi.com";

/// Account fields that may carry the credit count, highest priority first.
const REMAINING_FIELDS: &[&str] = &["total_searches_left", "plan_searches_left", "searches_left"];

pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, timeout, BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: String,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl SearchProvider for SerpApiClient {
    fn remaining_searches(&self) -> Result<i64, QuotaLookupError> {
        let url = format!("{}/account", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(QuotaLookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let remaining = parse_remaining_searches(&body)?;
        tracing::debug!(remaining, "Fetched SerpApi account status");
        Ok(remaining)
    }

    fn search_jobs(&self, role: &RoleQuery) -> Result<Vec<JobPosting>, SearchError> {
        let url = format!("{}/search.json", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google_jobs"),
                ("q", role.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        let jobs = parse_search_response(status, &body)?;
        tracing::debug!(role = %role, count = jobs.len(), "Fetched Google Jobs results");
        Ok(jobs)
    }
}

/// Extracts the credit count from an `/account` body.
pub fn parse_remaining_searches(body: &str) -> Result<i64, QuotaLookupError> {
    let account: Value = serde_json::from_str(body)?;

    REMAINING_FIELDS
        .iter()
        .find_map(|field| account.get(*field).and_then(finite_number))
        .map(|n| n.floor().max(0.0) as i64)
        .ok_or(QuotaLookupError::MissingCount)
}

fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// SerpApi reports a search without matches as an error payload on HTTP 200.
fn is_empty_result_notice(message: &str) -> bool {
    message.to_lowercase().contains("hasn't returned any results")
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    jobs_results: Vec<RawJob>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    detected_extensions: Option<DetectedExtensions>,
    #[serde(default)]
    apply_options: Vec<ApplyOption>,
}

#[derive(Debug, Deserialize)]
struct DetectedExtensions {
    #[serde(default)]
    posted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApplyOption {
    #[serde(default)]
    link: Option<String>,
}

impl From<RawJob> for JobPosting {
    fn from(raw: RawJob) -> Self {
        let posted_at = raw.detected_extensions.and_then(|ext| ext.posted_at);
        let apply_url = raw.apply_options.into_iter().next().and_then(|opt| opt.link);
        JobPosting::new(raw.title, raw.company_name, raw.location, posted_at, apply_url)
    }
}

/// Turns a `/search.json` reply into postings or a classified error.
///
/// HTTP 429 is a quota signal whatever the body says. Error payloads whose
/// text mentions quota wording are quota signals too. The provider's "no
/// results" payload is an empty result; every other error is fatal for the run.
pub fn parse_search_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<JobPosting>, SearchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let message = serde_json::from_str::<SearchResponse>(body)
            .ok()
            .and_then(|resp| resp.error)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(SearchError::QuotaExceeded(message));
    }

    let parsed = serde_json::from_str::<SearchResponse>(body);

    if let Ok(SearchResponse {
        error: Some(message),
        error_code,
        ..
    }) = &parsed
    {
        if mentions_quota(message) {
            return Err(SearchError::QuotaExceeded(message.clone()));
        }
        if status.is_success() && is_empty_result_notice(message) {
            return Ok(Vec::new());
        }
        if status.is_success() {
            let message = match error_code {
                Some(code) => format!("{} (code {})", message, code),
                None => message.clone(),
            };
            return Err(SearchError::Provider(message));
        }
    }

    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    Ok(parsed?.jobs_results.into_iter().map(JobPosting::from).collect())
}
