//! Error types for the digest run.

use std::error::Error as StdError;
use thiserror::Error;

/// Missing or unusable settings. Raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("ROLE_QUERIES contains no usable role")]
    NoRoles,
}

/// Failure of a single per-role search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP 429 or an error payload mentioning quota/limit/exceeded.
    #[error("search quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("network error")]
    Transport(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("search API error: {0}")]
    Provider(String),

    #[error("could not parse search response")]
    Parse(#[from] serde_json::Error),
}

/// The account lookup failed or reported no usable credit count.
#[derive(Debug, Error)]
pub enum QuotaLookupError {
    #[error("network error")]
    Transport(#[from] reqwest::Error),

    #[error("account API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not parse account response")]
    Parse(#[from] serde_json::Error),

    #[error("account response has no finite remaining-search count")]
    MissingCount,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("network error")]
    Transport(#[from] reqwest::Error),

    #[error("email API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Fatal run-level errors. Quota exhaustion during searches never shows up
/// here; it is absorbed into the report.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("quota lookup failed")]
    QuotaLookup(#[from] QuotaLookupError),

    #[error("search for \"{role}\" failed")]
    Search {
        role: String,
        #[source]
        source: SearchError,
    },

    #[error("sending report failed")]
    Delivery(#[from] MailError),
}

pub type Result<T> = std::result::Result<T, DigestError>;

/// Formats an error and its sources as one line, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Quota wording a provider error message may use.
pub fn mentions_quota(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ["quota", "limit", "exceeded"]
        .iter()
        .any(|word| lowered.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_quota() {
        assert!(mentions_quota("Your account has run out of searches. Quota exceeded."));
        assert!(mentions_quota("Monthly LIMIT reached"));
        assert!(mentions_quota("Plan Exceeded"));
        assert!(!mentions_quota("Invalid API key."));
        assert!(!mentions_quota("Google hasn't returned any results for this query."));
    }

    fn provider_failure() -> DigestError {
        DigestError::Search {
            role: "Staff Eng".into(),
            source: SearchError::Provider("Invalid API key.".into()),
        }
    }

    #[test]
    fn test_search_error_chain_names_role_once() {
        let err = DigestError::Search {
            role: "Staff Eng".into(),
            source: SearchError::Status {
                status: 500,
                body: "boom".into(),
            },
        };
        assert_eq!(err.to_string(), "search for \"Staff Eng\" failed");
        assert_eq!(
            error_chain(&err),
            "search for \"Staff Eng\" failed: search API returned 500: boom"
        );
    }

    #[test]
    fn test_cause_is_printed_once() {
        let chained = error_chain(&provider_failure());
        assert_eq!(chained.matches("Invalid API key.").count(), 1);

        let wrapped = anyhow::Error::from(provider_failure()).context("Job digest run");
        let text = format!("{:#}", wrapped);
        assert_eq!(
            text,
            "Job digest run: search for \"Staff Eng\" failed: search API error: Invalid API key."
        );
    }

    #[test]
    fn test_transport_error_keeps_detail_in_chain() {
        let err = SearchError::Transport(crate::testing::transport_error());
        assert_eq!(err.to_string(), "network error");
        assert!(error_chain(&err).starts_with("network error: "));
    }
}
