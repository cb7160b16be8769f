// Test doubles for the remote collaborators.
//
// FakeSearch replays scripted answers in call order; SpyMailer records every
// email it is asked to send.

use crate::error::{MailError, QuotaLookupError, SearchError};
use crate::traits::{Email, Mailer, SearchProvider};
use common::{JobPosting, RoleQuery};
use std::cell::RefCell;
use std::collections::VecDeque;

pub struct FakeSearch {
    remaining: RefCell<Option<Result<i64, QuotaLookupError>>>,
    responses: RefCell<VecDeque<Result<Vec<JobPosting>, SearchError>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeSearch {
    pub fn with_quota(remaining: i64) -> Self {
        Self {
            remaining: RefCell::new(Some(Ok(remaining))),
            responses: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_quota_error(error: QuotaLookupError) -> Self {
        let fake = Self::with_quota(0);
        *fake.remaining.borrow_mut() = Some(Err(error));
        fake
    }

    pub fn then_jobs(self, jobs: Vec<JobPosting>) -> Self {
        self.responses.borrow_mut().push_back(Ok(jobs));
        self
    }

    pub fn then_error(self, error: SearchError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    /// Roles searched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl SearchProvider for FakeSearch {
    fn remaining_searches(&self) -> Result<i64, QuotaLookupError> {
        self.remaining
            .borrow_mut()
            .take()
            .expect("remaining_searches called more than once")
    }

    fn search_jobs(&self, role: &RoleQuery) -> Result<Vec<JobPosting>, SearchError> {
        self.calls.borrow_mut().push(role.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct SpyMailer {
    fail: bool,
    sent: RefCell<Vec<Email>>,
    attempts: RefCell<usize>,
}

impl SpyMailer {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: RefCell::new(Vec::new()),
            attempts: RefCell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }
}

impl Mailer for SpyMailer {
    fn send(&self, email: &Email) -> Result<(), MailError> {
        *self.attempts.borrow_mut() += 1;
        if self.fail {
            return Err(MailError::Status {
                status: 500,
                body: "mail provider down".into(),
            });
        }
        self.sent.borrow_mut().push(email.clone());
        Ok(())
    }
}

/// A genuine `reqwest::Error` built without touching the network.
pub fn transport_error() -> reqwest::Error {
    reqwest::blocking::Client::new()
        .get("not a url")
        .send()
        .expect_err("invalid URL must fail")
}

pub fn posting(title: &str, company: &str, posted_at: &str) -> JobPosting {
    JobPosting::new(
        title,
        company,
        "Remote",
        Some(posted_at.to_string()),
        Some(format!("https://jobs.example/{}", title.to_lowercase().replace(' ', "-"))),
    )
}
