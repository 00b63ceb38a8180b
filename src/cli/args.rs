use clap::Parser;

use crate::infrastructure::logging::LogFormat;

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|e| e.to_string())
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "review-analyzer",
    version,
    about = "Product review analyzer - sentiment and key point extraction over a REST API",
    long_about = "review-analyzer accepts product reviews over HTTP, classifies their sentiment with a HuggingFace model, extracts key points with Gemini, and stores the combined result. Settings come from .env, environment variables and these flags (flags win)."
)]
pub struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Database URL: sqlite:..., postgres://... or memory:// (overrides DATABASE_URL)
    #[arg(short = 'd', long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Run sentiment classification and key point extraction concurrently
    #[arg(long = "concurrent-analysis", default_value_t = false)]
    pub concurrent_analysis: bool,
}
