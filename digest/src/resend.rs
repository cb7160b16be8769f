//! Email delivery through the Resend HTTP API, plus a log-only mailer for dry runs.

use crate::error::MailError;
use crate::traits::{Email, Mailer};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.resend.com";

pub struct ResendClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl ResendClient {
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

impl Mailer for ResendClient {
    fn send(&self, email: &Email) -> Result<(), MailError> {
        let request = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        let resp = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Writes emails to the log instead of sending them.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Dry run, email not sent:\n{}",
            email.text
        );
        Ok(())
    }
}
