use std::error::Error;

use ai_llm_service::telemetry;
use api::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the process environment may carry everything.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_env()?;
    info!(
        addr = %config.bind_address,
        llm = config.llm.provider.as_str(),
        model = %config.llm.model,
        background = config.review_in_background,
        "starting mr-review-hook"
    );

    api::start(config).await?;

    Ok(())
}
