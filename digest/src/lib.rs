//! Daily job digest.
//!
//! Searches Google Jobs (through SerpApi) for each configured role, keeps the
//! postings published today, and emails one summary. Search credits are
//! tracked for the whole run so no call is made once the quota is gone.

pub mod config;
pub mod error;
pub mod notifier;
pub mod orchestrator;
pub mod quota;
pub mod resend;
pub mod serpapi;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{DigestError, Result};
pub use notifier::Notifier;
pub use orchestrator::{Orchestrator, RunOutcome};
pub use resend::{LogMailer, ResendClient};
pub use serpapi::SerpApiClient;
pub use traits::{Email, Mailer, SearchProvider};
