use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use patient_intake::config::IntakeConfig;
use patient_intake::records::{HttpRecordsTransport, SubmissionClient};
use patient_intake::registration::{RegistrationDesk, RegistrationRouteState, registration_routes};
use patient_intake::tools::{SubmitRegistrationTool, ToolRegistry, ToolRouteState, tool_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Optional rolling log file alongside stderr
    let (file_layer, _log_guard) = match std::env::var("INTAKE_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "patient-intake.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    let config = IntakeConfig::from_env()?;

    let transport = Arc::new(HttpRecordsTransport::from_config(&config)?);

    eprintln!("🩺 Patient Intake v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Records API: {}", transport.endpoint());
    eprintln!(
        "   Retry: {} attempts, {:?} per attempt, {:?} base backoff",
        config.retry.max_attempts, config.retry.attempt_timeout, config.retry.base_backoff
    );

    let client = SubmissionClient::new(transport, config.retry);
    let desk = Arc::new(RegistrationDesk::new(client));

    // ── Tools ────────────────────────────────────────────────────────────
    let tools = Arc::new(ToolRegistry::new());
    tools.register_sync(Arc::new(SubmitRegistrationTool::new(Arc::clone(&desk))));
    eprintln!("   Tools: {} registered", tools.count());
    eprintln!("   Intake API: http://0.0.0.0:{}/api/registrations\n", config.port);

    let app = registration_routes(RegistrationRouteState { desk })
        .merge(tool_routes(ToolRouteState { registry: tools }))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Intake API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
