pub mod bank;
pub mod notify;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;

pub use bank::{Question, QuestionBank, QuestionBankError, QuestionView};
pub use notify::{DeliveryOutcome, ReportNotifier, SmtpNotifier};
pub use report::{CsvExport, ExportError, QuestionOutcome, QuizReport};
pub use router::quiz_router;
pub use scoring::{percentage, score, PassStatus, PASS_THRESHOLD};
pub use service::{QuizService, ServiceError, SessionSnapshot, SubmissionReceipt};
pub use session::{QuizSession, SessionError, SessionPhase};
pub use store::{SessionStore, SessionToken, StoreError};
