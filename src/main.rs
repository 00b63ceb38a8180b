use clap::Parser;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};

use review_analyzer::api::{create_router, AiServiceStatus, AppState};
use review_analyzer::cli::args::Args;
use review_analyzer::config::Config;
use review_analyzer::core::ai::{
    build_client, AIProvider, GeminiProvider, KeyPointExtractor, SentimentClient,
};
use review_analyzer::infrastructure::logging::{setup_logging, LoggingConfig};
use review_analyzer::review::ReviewOrchestrator;
use review_analyzer::storage::connect_store;

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    setup_logging(LoggingConfig {
        level,
        format: config.log_format,
        output: config.log_output,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::new();
    config.update_from_args(&args);
    config.validate()?;

    init_tracing(&config)?;

    info!("Starting review-analyzer v{}", env!("CARGO_PKG_VERSION"));

    let client = build_client(&config.http_client_config())?;
    let sentiment = Arc::new(SentimentClient::new(client.clone(), config.sentiment_config()));
    let provider: Arc<dyn AIProvider> =
        Arc::new(GeminiProvider::new(client, config.gemini_config()));
    let key_points = Arc::new(KeyPointExtractor::new(provider));

    // 缺少凭证时服务照常启动，分析结果走降级值
    let ai_status = AiServiceStatus {
        sentiment_configured: sentiment.is_configured(),
        key_points_configured: key_points.is_configured(),
    };
    info!(
        "HuggingFace token loaded: {}, Gemini API key loaded: {}",
        ai_status.sentiment_configured, ai_status.key_points_configured
    );
    if !ai_status.sentiment_configured || !ai_status.key_points_configured {
        warn!("AI credentials missing, analysis will return fallback values");
    }

    let store = connect_store(&config.storage_config()).await?;
    info!("Storage ready: {}", store.storage_type().as_str());

    let orchestrator = ReviewOrchestrator::new(sentiment, key_points, store)
        .with_mode(config.analysis_mode);
    info!("Analysis mode: {:?}", orchestrator.mode());

    let state = AppState::new(Arc::new(orchestrator), ai_status);
    let app = create_router(state, &config.cors_origins);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
