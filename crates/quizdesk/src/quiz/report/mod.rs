mod export;
mod render;
mod summary;

pub use export::{CsvExport, ExportError};
pub use summary::{QuestionOutcome, QuizReport, NOT_ANSWERED};
