//! Renders per-role outcomes into the plain-text email body.

use crate::{JobPosting, RoleQuery};
use serde::{Deserialize, Serialize};

/// Outcome of one role query.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ReportSection {
    /// Fresh, de-duplicated postings in provider order.
    Results(Vec<JobPosting>),
    NoResults,
    /// Not searched because the quota ran out before this role.
    QuotaSkipped,
    /// The quota ran out at this role; carries the explanation.
    QuotaTriggeredHere { message: String },
}

pub fn render_section(role: &RoleQuery, section: &ReportSection) -> String {
    let heading = role.as_str();
    let mut out = format!("{}\n{}\n", heading, "-".repeat(heading.chars().count()));

    match section {
        ReportSection::Results(jobs) => {
            for (i, job) in jobs.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {} at {} ({})\n",
                    i + 1,
                    job.title,
                    job.company,
                    job.location
                ));
                if let Some(posted) = &job.posted_at {
                    out.push_str(&format!("   Posted: {}\n", posted));
                }
                out.push_str(&format!("   Apply: {}\n", job.apply_url));
            }
        }
        ReportSection::NoResults => out.push_str("No new postings today.\n"),
        ReportSection::QuotaSkipped => {
            out.push_str("Skipped: search quota was reached earlier in this run.\n")
        }
        ReportSection::QuotaTriggeredHere { message } => {
            out.push_str(&format!("Search quota reached at this role: {}\n", message));
            out.push_str("Roles after this one were not searched.\n");
        }
    }

    out
}

/// Joins rendered sections in role order, one blank line between them.
pub fn render_report(sections: &[(RoleQuery, ReportSection)]) -> String {
    sections
        .iter()
        .map(|(role, section)| render_section(role, section))
        .collect::<Vec<_>>()
        .join("\n")
}
