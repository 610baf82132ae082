use crate::infra::InMemorySessionStore;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use quizdesk::config::{AppConfig, MailerConfig};
use quizdesk::error::AppError;
use quizdesk::quiz::{DeliveryOutcome, QuestionBank, QuizService, SmtpNotifier};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Respondent name used for the scripted session
    #[arg(long, default_value = "Demo Respondent")]
    pub(crate) respondent: String,
    /// Answer every question correctly instead of the mixed scripted run
    #[arg(long)]
    pub(crate) perfect: bool,
    /// Skip report delivery even when mail is configured
    #[arg(long)]
    pub(crate) skip_delivery: bool,
    /// Write the CSV export to this path after the submission
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        respondent,
        perfect,
        skip_delivery,
        csv_out,
    } = args;

    let mailer = if skip_delivery {
        MailerConfig::default()
    } else {
        AppConfig::load()?.mailer
    };

    let store = Arc::new(InMemorySessionStore::default());
    let notifier = Arc::new(SmtpNotifier::new(mailer));
    let service = QuizService::new(QuestionBank::standard(), store, notifier);

    println!("Quiz submission demo");
    let token = service.start(&respondent)?.session_token;
    println!("Session {token} started for {respondent}");

    for (index, question) in service.bank().iter().enumerate() {
        // The mixed run misses the second question so the review path shows.
        let selected = if perfect || index != 1 {
            question.correct_option().to_string()
        } else {
            wrong_answer(question.correct_option(), question.options())
        };
        service.record_answer(&token, index, &selected)?;
        println!("- Q{}: answered '{}'", index + 1, selected);
    }

    let receipt = service.submit(&token, Local::now().naive_local())?;
    println!(
        "\nSubmitted: {} / {} ({}) -> {}",
        receipt.score,
        receipt.total_questions,
        receipt.percentage_display,
        receipt.status.label()
    );
    match &receipt.delivery {
        DeliveryOutcome::Delivered => println!("Report delivered to the configured recipient"),
        DeliveryOutcome::Skipped => println!("Report delivery skipped (mail not configured)"),
        DeliveryOutcome::Failed(reason) => {
            println!("Warning: report delivery failed ({reason}); submission kept")
        }
    }

    let report = service.report(&token, Local::now().naive_local())?;
    println!("\n{}", report.to_plain_text());

    if let Some(path) = csv_out {
        let export = service.export_csv(&token, Local::now().naive_local())?;
        std::fs::write(&path, &export.bytes)?;
        println!("CSV export written to {} ({})", path.display(), export.filename);
    }

    Ok(())
}

fn wrong_answer(correct: &str, options: &[String]) -> String {
    options
        .iter()
        .find(|option| option.as_str() != correct)
        .map(|option| option.to_string())
        .unwrap_or_else(|| correct.to_string())
}
