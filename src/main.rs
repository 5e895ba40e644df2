use msgram_action::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "msgram_action=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = try_main().await {
        tracing::error!("MeasureSoftGram action failed: {:#}", e);
        // Workflow command so the failure shows up as an annotation on the run.
        let message = format!("{e:#}").replace('\n', "%0A");
        println!("::error::{message}");
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    msgram_action::run(config).await
}
