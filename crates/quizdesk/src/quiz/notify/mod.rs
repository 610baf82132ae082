mod smtp;

pub use smtp::SmtpNotifier;

use serde::Serialize;

use super::report::QuizReport;

/// Terminal result of one delivery attempt. Exactly one synchronous attempt is
/// made per submission: no retry, no queue, at-most-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The transport accepted the message.
    Delivered,
    /// Mail is not configured on this host; nothing was attempted.
    Skipped,
    /// The attempt ran and failed; the submission itself stands.
    Failed(String),
}

impl DeliveryOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::Skipped => "skipped",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }
}

/// Outbound hook handing a finished report to an external recipient.
pub trait ReportNotifier: Send + Sync {
    fn notify(&self, report: &QuizReport) -> DeliveryOutcome;
}
