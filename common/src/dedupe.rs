use crate::JobPosting;
use std::collections::HashSet;

/// Identity of a posting: lowercased, trimmed title and company joined by `|`.
pub fn dedupe_key(job: &JobPosting) -> String {
    format!(
        "{}|{}",
        job.title.trim().to_lowercase(),
        job.company.trim().to_lowercase()
    )
}

/// Drops repeated postings, keeping the first occurrence and the original order.
/// Location, posted-at and apply URL play no part in the comparison.
pub fn dedupe(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen: HashSet<String> = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(dedupe_key(job)))
        .collect()
}
