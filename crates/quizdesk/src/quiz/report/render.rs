use std::fmt::Write as _;

use super::summary::QuizReport;

impl QuizReport {
    /// Plain-text rendering used for the notification body and human display.
    pub fn to_plain_text(&self) -> String {
        let mut body = String::new();

        writeln!(body, "New Quiz Submission").expect("write title");
        body.push('\n');
        writeln!(body, "Respondent: {}", self.respondent_name).expect("write respondent");
        writeln!(body, "Score: {} / {}", self.score, self.total_questions).expect("write score");
        writeln!(body, "Percentage: {}", self.percentage_display()).expect("write percentage");
        writeln!(
            body,
            "Status: {} {}",
            self.status.marker(),
            self.status.label()
        )
        .expect("write status");
        writeln!(body, "Timestamp: {}", self.timestamp_display()).expect("write timestamp");
        body.push('\n');
        writeln!(body, "Detailed responses:").expect("write heading");

        for outcome in &self.per_question {
            body.push('\n');
            writeln!(body, "Question {}: {}", outcome.index + 1, outcome.prompt)
                .expect("write prompt");
            writeln!(body, "Given answer: {}", outcome.given_or_sentinel())
                .expect("write given answer");
            writeln!(body, "Correct answer: {}", outcome.correct_answer)
                .expect("write correct answer");
            let marker = if outcome.is_correct {
                "\u{2713} Correct"
            } else {
                "\u{2717} Incorrect"
            };
            writeln!(body, "Result: {marker}").expect("write result");
            writeln!(body, "{}", "-".repeat(50)).expect("write divider");
        }

        body
    }

    /// HTML rendering carried as the alternative part of the notification.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        writeln!(html, "<h2>New Quiz Submission</h2>").expect("write heading");
        html.push_str("<ul>");
        writeln!(
            html,
            "<li><strong>Respondent:</strong> {}</li>",
            escape_html(&self.respondent_name)
        )
        .expect("write respondent");
        writeln!(
            html,
            "<li><strong>Score:</strong> {} / {}</li>",
            self.score, self.total_questions
        )
        .expect("write score");
        writeln!(
            html,
            "<li><strong>Percentage:</strong> {}</li>",
            self.percentage_display()
        )
        .expect("write percentage");
        writeln!(
            html,
            "<li><strong>Status:</strong> {}</li>",
            self.status.label()
        )
        .expect("write status");
        writeln!(
            html,
            "<li><strong>Timestamp:</strong> {}</li>",
            self.timestamp_display()
        )
        .expect("write timestamp");
        html.push_str("</ul>\n");

        writeln!(html, "<h3>Detailed Responses</h3>").expect("write subheading");
        html.push_str("<ol>");
        for outcome in &self.per_question {
            let marker = if outcome.is_correct {
                "\u{2713} Correct"
            } else {
                "\u{2717} Incorrect"
            };
            writeln!(
                html,
                "<li>{}<br/>Given answer: <strong>{}</strong><br/>Correct answer: <strong>{}</strong><br/>{}</li>",
                escape_html(&outcome.prompt),
                escape_html(outcome.given_or_sentinel()),
                escape_html(&outcome.correct_answer),
                marker
            )
            .expect("write response item");
        }
        html.push_str("</ol>\n");

        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::bank::QuestionBank;
    use crate::quiz::report::NOT_ANSWERED;
    use crate::quiz::session::QuizSession;
    use chrono::NaiveDate;

    fn report(answers: &[(usize, &str)], submit: bool) -> QuizReport {
        let bank = QuestionBank::standard();
        let mut session = QuizSession::new();
        session.start("Jordan <Ellis>").expect("start");
        for (index, option) in answers {
            session
                .record_answer(&bank, *index, option)
                .expect("answer records");
        }
        if submit {
            session.submit(&bank).expect("submit succeeds");
        }
        let stamp = NaiveDate::from_ymd_opt(2026, 8, 7)
            .expect("valid date")
            .and_hms_opt(9, 30, 0)
            .expect("valid time");
        QuizReport::from_session(&session, &bank, stamp)
    }

    #[test]
    fn plain_text_carries_summary_and_breakdown() {
        let text = report(&[(0, "Ethos"), (1, "Logos"), (2, "Logos")], true).to_plain_text();
        assert!(text.contains("Respondent: Jordan <Ellis>"));
        assert!(text.contains("Score: 2 / 3"));
        assert!(text.contains("Percentage: 66.7%"));
        assert!(text.contains("Status: \u{2717} Review Needed"));
        assert!(text.contains("Timestamp: 2026-08-07 09:30:00"));
        assert!(text.contains("Question 1: Which rhetorical appeal focuses on credibility?"));
        assert!(text.contains("\u{2713} Correct"));
        assert!(text.contains("\u{2717} Incorrect"));
    }

    #[test]
    fn plain_text_marks_missing_answers() {
        let text = report(&[(0, "Ethos")], false).to_plain_text();
        assert!(text.contains(&format!("Given answer: {NOT_ANSWERED}")));
    }

    #[test]
    fn html_escapes_untrusted_content() {
        let html = report(&[(0, "Ethos"), (1, "Pathos"), (2, "Logos")], true).to_html();
        assert!(html.contains("Jordan &lt;Ellis&gt;"));
        assert!(!html.contains("Jordan <Ellis>"));
        assert!(html.contains("<h2>New Quiz Submission</h2>"));
        assert!(html.contains("<strong>Percentage:</strong> 100.0%"));
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }
}
