use std::sync::Arc;

use anyhow::Context;

use onboard_assist::channels::run_cli;
use onboard_assist::config::{GenerationConfig, RunMode, ServerConfig};
use onboard_assist::llm::{GenerationClient, TextGenerator};
use onboard_assist::onboarding::{OnboardingRouteState, onboarding_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the session output on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let generation = GenerationConfig::from_env().context("invalid generation settings")?;
    let server = ServerConfig::from_env(&args);

    eprintln!("🤝 Onboard Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", generation.model);
    eprintln!("   Endpoint: {}", generation.endpoint);

    let generator: Arc<dyn TextGenerator> = Arc::new(GenerationClient::new(generation));

    match server.mode {
        RunMode::Cli => {
            eprintln!("   Enter the employee's details, then type 'help'.\n");
            run_cli(generator).await?;
        }
        RunMode::Serve => {
            let app = onboarding_routes(OnboardingRouteState::new(generator));
            let addr = format!("0.0.0.0:{}", server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            eprintln!("   API: http://{addr}/api/onboarding/status\n");
            tracing::info!(port = server.port, "Onboarding API started");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
