use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use quizdesk::config::AppConfig;
use quizdesk::error::AppError;
use quizdesk::quiz::{QuestionBank, QuizService, SmtpNotifier};
use quizdesk::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let mail_configured = config.mailer.credentials().is_some();
    let store = Arc::new(InMemorySessionStore::default());
    let notifier = Arc::new(SmtpNotifier::new(config.mailer.clone()));
    let quiz_service = Arc::new(QuizService::new(QuestionBank::standard(), store, notifier));

    let app = with_quiz_routes(quiz_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, mail_configured, "quiz submission service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
