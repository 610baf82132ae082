use super::summary::QuizReport;

/// In-memory CSV artifact: one header row plus one wide data row per export.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Error raised while encoding the export row.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to encode results row: {0}")]
    Encode(#[from] csv::Error),
    #[error("unable to finish csv buffer: {0}")]
    Finish(String),
}

impl QuizReport {
    /// Encodes the wide one-row export: summary columns followed by the
    /// respondent's literal answer per question (Q1..QN).
    pub fn to_csv(&self) -> Result<CsvExport, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            "Respondent Name".to_string(),
            "Score".to_string(),
            "Total Questions".to_string(),
            "Percentage".to_string(),
            "Timestamp".to_string(),
        ];
        for outcome in &self.per_question {
            header.push(format!("Q{}", outcome.index + 1));
        }
        writer.write_record(&header)?;

        let mut row = vec![
            self.respondent_name.clone(),
            self.score.to_string(),
            self.total_questions.to_string(),
            self.percentage_display(),
            self.timestamp_display(),
        ];
        for outcome in &self.per_question {
            row.push(outcome.given_or_sentinel().to_string());
        }
        writer.write_record(&row)?;

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Finish(err.to_string()))?;

        Ok(CsvExport {
            filename: self.export_filename(),
            bytes,
        })
    }

    /// `quiz_results_<respondent>_<YYYYMMDD_HHMMSS>.csv`, with the respondent
    /// slugged so the name survives a Content-Disposition header.
    pub fn export_filename(&self) -> String {
        format!(
            "quiz_results_{}_{}.csv",
            slug(&self.respondent_name),
            self.timestamp.format("%Y%m%d_%H%M%S")
        )
    }
}

fn slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_separator = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "respondent".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::bank::QuestionBank;
    use crate::quiz::session::QuizSession;
    use chrono::NaiveDate;

    fn submitted_report() -> QuizReport {
        let bank = QuestionBank::standard();
        let mut session = QuizSession::new();
        session.start("Jordan Ellis").expect("start");
        session.record_answer(&bank, 0, "Ethos").expect("q1");
        session.record_answer(&bank, 1, "Logos").expect("q2");
        session.record_answer(&bank, 2, "Logos").expect("q3");
        session.submit(&bank).expect("submit");

        let stamp = NaiveDate::from_ymd_opt(2026, 8, 7)
            .expect("valid date")
            .and_hms_opt(14, 5, 9)
            .expect("valid time");
        QuizReport::from_session(&session, &bank, stamp)
    }

    #[test]
    fn export_holds_header_and_single_wide_row() {
        let export = submitted_report().to_csv().expect("export encodes");
        let text = String::from_utf8(export.bytes).expect("utf-8 output");
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Respondent Name,Score,Total Questions,Percentage,Timestamp,Q1,Q2,Q3")
        );
        assert_eq!(
            lines.next(),
            Some("Jordan Ellis,2,3,66.7%,2026-08-07 14:05:09,Ethos,Logos,Logos")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn filename_follows_pattern() {
        let export = submitted_report().to_csv().expect("export encodes");
        assert_eq!(
            export.filename,
            "quiz_results_Jordan_Ellis_20260807_140509.csv"
        );
    }

    #[test]
    fn slug_collapses_awkward_names() {
        assert_eq!(slug("Jordan  Q. Ellis"), "Jordan_Q_Ellis");
        assert_eq!(slug("???"), "respondent");
        assert_eq!(slug("  padded  "), "padded");
    }
}
