use std::env;
use std::error::Error;

use log::info;

use crate::classifier::SentimentClassifier;
use crate::config::Config;
use crate::llm::gemini::GeminiClient;

mod api;
mod classifier;
mod config;
mod encoding;
mod helper;
mod llm;

const USAGE: &str = "usage: sentiment-oracle <text> | sentiment-oracle --serve";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // Logging
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let arg = env::args().nth(1).ok_or(USAGE)?;

    // 1️⃣ Load config
    let cfg = Config::from_env()?;

    // 2️⃣ Provider + classifier
    let model = GeminiClient::from_config(&cfg)?;
    info!(
        "Using {} with profile {} (fallback {})",
        model.redacted_endpoint(),
        cfg.profile.name,
        cfg.profile.fallback_sentinel
    );
    let classifier = SentimentClassifier::new(model, cfg.profile.clone(), cfg.thinking_budget);

    if arg == "--serve" {
        let app = api::create_router(classifier);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.api_port)).await?;
        info!("API listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        return Ok(());
    }

    // 3️⃣ One-shot: classify, then hand the encoded result back to the host
    let output = classifier.classify_output(&arg).await?;
    let encoded = encoding::to_hex(&encoding::encode_string(&output));
    info!("Result: {} -> {}", output.trim(), encoded);
    println!("{}", encoded);

    Ok(())
}
