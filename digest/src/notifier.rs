use crate::error::{error_chain, MailError};
use crate::traits::{Email, Mailer};
use std::error::Error;

pub const REPORT_SUBJECT: &str = "Daily job postings";
pub const FAILURE_SUBJECT: &str = "Job digest failed";

/// Sends the two kinds of message a run produces: the report and failure notices.
pub struct Notifier<M> {
    mailer: M,
    from: String,
    to: String,
}

impl<M: Mailer> Notifier<M> {
    pub fn new(mailer: M, from: String, to: String) -> Self {
        Self { mailer, from, to }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub fn send_report(&self, body: String) -> Result<(), MailError> {
        self.mailer.send(&self.email(REPORT_SUBJECT, body))
    }

    /// Best effort. A delivery failure here is logged and swallowed so the
    /// original error stays the one that surfaces.
    pub fn send_failure_notice(&self, stage: &str, error: &(dyn Error + 'static)) {
        let body = failure_body(stage, error);
        if let Err(e) = self.mailer.send(&self.email(FAILURE_SUBJECT, body)) {
            tracing::error!(stage, error = %error_chain(&e), "Failed to send failure notice");
        }
    }

    fn email(&self, subject: &str, text: String) -> Email {
        Email {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: subject.to_string(),
            text,
        }
    }
}

fn failure_body(stage: &str, error: &(dyn Error + 'static)) -> String {
    let mut body = format!("The job digest failed while {}.\n\nError: {}\n", stage, error);
    let mut source = error.source();
    while let Some(cause) = source {
        body.push_str(&format!("Caused by: {}\n", cause));
        source = cause.source();
    }
    body
}
