// Seams to the two remote collaborators.
//
// The orchestrator only talks to these traits; the HTTP clients and the test
// fakes implement them.

use crate::error::{MailError, QuotaLookupError, SearchError};
use common::{JobPosting, RoleQuery};

pub trait SearchProvider {
    /// Search credits left on the account.
    fn remaining_searches(&self) -> Result<i64, QuotaLookupError>;

    /// Raw postings for one role, unfiltered and in provider order.
    fn search_jobs(&self, role: &RoleQuery) -> Result<Vec<JobPosting>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

pub trait Mailer {
    fn send(&self, email: &Email) -> Result<(), MailError>;
}
