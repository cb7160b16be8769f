//! Drives the role queries under the search quota and sends the report.
//!
//! Roles run strictly one after another: the quota is checked before and
//! decremented after every search. Once the quota is known to be gone the
//! latch closes for the rest of the run, later roles are skipped without a
//! call, and exactly one section explains why.

use crate::error::{error_chain, DigestError, Result, SearchError};
use crate::notifier::Notifier;
use crate::quota::{self, QuotaState};
use crate::traits::{Mailer, SearchProvider};
use chrono::{Local, NaiveDate};
use common::{dedupe, is_posted_on, render_report, JobPosting, ReportSection, RoleQuery};

const ZERO_AT_START_MESSAGE: &str = "the account had no search credits left when this run started";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuotaLatch {
    Open,
    Latched,
}

impl QuotaLatch {
    /// Closes the latch. `true` only for the call that actually closed it.
    fn engage(&mut self) -> bool {
        std::mem::replace(self, QuotaLatch::Latched) == QuotaLatch::Open
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report went out.
    Sent {
        sections: Vec<(RoleQuery, ReportSection)>,
    },
    /// No fresh postings and no quota event; nothing was emailed.
    NothingToReport,
}

pub struct Orchestrator<'a, S, M> {
    search: &'a S,
    notifier: &'a Notifier<M>,
    today: NaiveDate,
}

impl<'a, S, M> Orchestrator<'a, S, M>
where
    S: SearchProvider,
    M: Mailer,
{
    pub fn new(search: &'a S, notifier: &'a Notifier<M>) -> Self {
        Self::for_date(search, notifier, Local::now().date_naive())
    }

    /// Uses `today` as the freshness reference instead of the local clock.
    pub fn for_date(search: &'a S, notifier: &'a Notifier<M>, today: NaiveDate) -> Self {
        Self {
            search,
            notifier,
            today,
        }
    }

    pub fn run(&self, roles: &[RoleQuery]) -> Result<RunOutcome> {
        let quota = quota::fetch_remaining_searches(self.search, self.notifier)?;
        let (sections, latch) = self.collect_sections(roles, quota)?;

        let has_postings = sections
            .iter()
            .any(|(_, section)| {
                matches!(section, ReportSection::Results(jobs) if !jobs.is_empty())
            });

        if latch == QuotaLatch::Open && !has_postings {
            tracing::info!(roles = roles.len(), "No new postings today, skipping email");
            return Ok(RunOutcome::NothingToReport);
        }

        self.notifier.send_report(render_report(&sections))?;
        tracing::info!(sections = sections.len(), "Report sent");
        Ok(RunOutcome::Sent { sections })
    }

    fn collect_sections(
        &self,
        roles: &[RoleQuery],
        mut quota: QuotaState,
    ) -> Result<(Vec<(RoleQuery, ReportSection)>, QuotaLatch)> {
        let started_empty = quota.is_exhausted();
        let mut latch = QuotaLatch::Open;
        let mut sections = Vec::with_capacity(roles.len());

        for role in roles {
            if quota.is_exhausted() {
                let section = if latch.engage() && started_empty {
                    ReportSection::QuotaTriggeredHere {
                        message: ZERO_AT_START_MESSAGE.to_string(),
                    }
                } else {
                    ReportSection::QuotaSkipped
                };
                tracing::warn!(role = %role, "Search quota exhausted, skipping role");
                sections.push((role.clone(), section));
                continue;
            }

            tracing::info!(role = %role, remaining = quota.remaining(), "Searching role");
            match self.search.search_jobs(role) {
                Ok(jobs) => {
                    quota.consume();
                    let fresh = self.fresh_postings(jobs);
                    tracing::info!(role = %role, fresh = fresh.len(), "Role search complete");
                    let section = if fresh.is_empty() {
                        ReportSection::NoResults
                    } else {
                        ReportSection::Results(fresh)
                    };
                    sections.push((role.clone(), section));
                }
                Err(SearchError::QuotaExceeded(message)) => {
                    tracing::warn!(role = %role, %message, "Provider reported quota exceeded");
                    latch.engage();
                    quota.exhaust();
                    sections.push((role.clone(), ReportSection::QuotaTriggeredHere { message }));
                }
                Err(source) => {
                    let err = DigestError::Search {
                        role: role.to_string(),
                        source,
                    };
                    tracing::error!(
                        role = %role,
                        error = %error_chain(&err),
                        "Search failed, aborting run"
                    );
                    self.notifier
                        .send_failure_notice(&format!("searching \"{}\"", role), &err);
                    return Err(err);
                }
            }
        }

        Ok((sections, latch))
    }

    fn fresh_postings(&self, jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        let posted_today: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| is_posted_on(job.posted_at.as_deref(), self.today))
            .collect();
        dedupe(posted_today)
    }
}
