use crate::error::{error_chain, QuotaLookupError};
use crate::notifier::Notifier;
use crate::traits::{Mailer, SearchProvider};

/// Search credits left for the rest of this run. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    remaining: i64,
}

impl QuotaState {
    pub fn new(remaining: i64) -> Self {
        Self {
            remaining: remaining.max(0),
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }

    /// One search attempted, whatever it returned.
    pub fn consume(&mut self) {
        self.remaining = (self.remaining - 1).max(0);
    }

    /// The provider reported the quota gone.
    pub fn exhaust(&mut self) {
        self.remaining = 0;
    }
}

/// Asks the provider for the credit count. On failure the operator gets a
/// failure notice before the error is returned.
pub fn fetch_remaining_searches<S, M>(
    search: &S,
    notifier: &Notifier<M>,
) -> Result<QuotaState, QuotaLookupError>
where
    S: SearchProvider,
    M: Mailer,
{
    match search.remaining_searches() {
        Ok(remaining) => {
            tracing::info!(remaining, "Search quota available for this run");
            Ok(QuotaState::new(remaining))
        }
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Failed to look up remaining searches");
            notifier.send_failure_notice("checking the remaining search quota", &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::FAILURE_SUBJECT;
    use crate::testing::{FakeSearch, SpyMailer};

    fn notifier(mailer: SpyMailer) -> Notifier<SpyMailer> {
        Notifier::new(mailer, "digest@example.com".into(), "me@example.com".into())
    }

    #[test]
    fn test_consume_and_exhaust() {
        let mut quota = QuotaState::new(2);
        assert!(!quota.is_exhausted());
        quota.consume();
        assert_eq!(quota.remaining(), 1);
        quota.consume();
        assert!(quota.is_exhausted());
        quota.consume();
        assert_eq!(quota.remaining(), 0);

        let mut quota = QuotaState::new(50);
        quota.exhaust();
        assert!(quota.is_exhausted());
    }

    #[test]
    fn test_negative_start_clamps() {
        assert_eq!(QuotaState::new(-3).remaining(), 0);
    }

    #[test]
    fn test_fetch_success_sends_nothing() {
        let n = notifier(SpyMailer::new());
        let quota = fetch_remaining_searches(&FakeSearch::with_quota(5), &n).unwrap();
        assert_eq!(quota.remaining(), 5);
        assert_eq!(n.mailer().attempts(), 0);
    }

    #[test]
    fn test_fetch_failure_notifies_operator() {
        let n = notifier(SpyMailer::new());
        let search = FakeSearch::with_quota_error(QuotaLookupError::MissingCount);
        let err = fetch_remaining_searches(&search, &n).unwrap_err();
        assert!(matches!(err, QuotaLookupError::MissingCount));

        let sent = n.mailer().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, FAILURE_SUBJECT);
        assert!(sent[0].text.contains("remaining search quota"));
    }

    #[test]
    fn test_fetch_failure_survives_broken_mailer() {
        let n = notifier(SpyMailer::failing());
        let search = FakeSearch::with_quota_error(QuotaLookupError::Status {
            status: 401,
            body: "bad key".into(),
        });
        let err = fetch_remaining_searches(&search, &n).unwrap_err();
        assert!(matches!(err, QuotaLookupError::Status { status: 401, .. }));
        assert_eq!(n.mailer().attempts(), 1);
    }
}
