use std::time::Duration;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, warn};

use super::{DeliveryOutcome, ReportNotifier};
use crate::config::MailerConfig;
use crate::quiz::report::QuizReport;

/// Delivers submission reports over authenticated SMTP (implicit TLS).
///
/// Missing sender credentials downgrade every attempt to
/// [`DeliveryOutcome::Skipped`], so hosts without mail configuration still run
/// the full submission flow.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    config: MailerConfig,
    timeout: Duration,
}

impl SmtpNotifier {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the transport timeout bounding the single delivery attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn attempt(
        &self,
        report: &QuizReport,
        sender: &str,
        password: &str,
        recipient: &str,
    ) -> Result<(), DeliveryError> {
        let from = parse_mailbox(sender)?;
        let to = parse_mailbox(recipient)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Quiz Submission: {}", report.respondent_name))
            .multipart(MultiPart::alternative_plain_html(
                report.to_plain_text(),
                report.to_html(),
            ))?;

        let mailer = SmtpTransport::relay(&self.config.smtp_relay)?
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .timeout(Some(self.timeout))
            .build();

        mailer.send(&message)?;
        Ok(())
    }
}

impl ReportNotifier for SmtpNotifier {
    fn notify(&self, report: &QuizReport) -> DeliveryOutcome {
        let Some((sender, password)) = self.config.credentials() else {
            debug!("mail credentials absent, skipping report delivery");
            return DeliveryOutcome::Skipped;
        };
        let Some(recipient) = self.config.recipient_or_sender() else {
            return DeliveryOutcome::Skipped;
        };

        match self.attempt(report, sender, password, recipient) {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) => {
                warn!(%err, relay = %self.config.smtp_relay, "report delivery failed");
                DeliveryOutcome::Failed(err.to_string())
            }
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|source| DeliveryError::Mailbox {
        address: address.to_string(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("invalid mailbox '{address}': {source}")]
    Mailbox {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("unable to assemble message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
