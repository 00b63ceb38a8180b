//! AI 服务适配层
//!
//! 情感分类与要点提取两个客户端都不向调用方返回错误，
//! 失败路径统一表现为 [`Analysis::Fallback`]。

pub mod http;
pub mod key_points;
pub mod outcome;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod sentiment;

pub use http::{build_client, HttpClientConfig};
pub use key_points::{KeyPointAnalyzer, KeyPointExtractor};
pub use outcome::Analysis;
pub use prompt::{PromptBuilder, PromptTemplate};
pub use provider::{AIProvider, ProviderConfig};
pub use providers::GeminiProvider;
pub use sentiment::{SentimentAnalyzer, SentimentClient, SentimentConfig};
