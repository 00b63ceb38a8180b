use std::io;
use std::str::FromStr;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            output: LogOutput::Stdout,
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown log format: {}", other),
        }
    }
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            other => anyhow::bail!("Unknown log output: {}", other),
        }
    }
}

impl LoggingConfig {
    /// 默认过滤规则，`RUST_LOG` 优先
    fn env_filter(&self) -> EnvFilter {
        let level = self.level.to_string().to_lowercase();
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("review_analyzer={},tower_http=info", level))
        })
    }
}

/// 设置日志系统
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = config.env_filter();

    let fmt_layer = match config.output {
        LogOutput::Stdout => create_fmt_layer(&config, io::stdout),
        LogOutput::Stderr => create_fmt_layer(&config, io::stderr),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

fn create_fmt_layer<W>(
    config: &LoggingConfig,
    make_writer: W,
) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// 分析阶段计时
pub struct StageTimer {
    stage: &'static str,
    start_time: Instant,
}

impl StageTimer {
    pub fn start(stage: &'static str) -> Self {
        tracing::debug!(stage, "stage started");
        Self {
            stage,
            start_time: Instant::now(),
        }
    }

    /// 结束计时并返回耗时（毫秒）
    pub fn finish(self, fallback: bool) -> u128 {
        let elapsed_ms = self.start_time.elapsed().as_millis();
        tracing::info!(
            stage = self.stage,
            elapsed_ms = elapsed_ms as u64,
            fallback,
            "stage finished"
        );
        elapsed_ms
    }
}
