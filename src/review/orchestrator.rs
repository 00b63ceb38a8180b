use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::core::ai::{KeyPointAnalyzer, SentimentAnalyzer};
use crate::infrastructure::logging::StageTimer;
use crate::models::{NewReview, Review, SentimentResult};
use crate::storage::ReviewStore;

/// 两个 AI 调用的执行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// 先情感分类，再提取要点
    #[default]
    Sequential,
    /// 两个调用并发执行，全部完成后再写库
    Concurrent,
}

impl FromStr for AnalysisMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(AnalysisMode::Sequential),
            "concurrent" => Ok(AnalysisMode::Concurrent),
            other => anyhow::bail!("Unknown analysis mode: {}", other),
        }
    }
}

/// 评论分析编排器
///
/// 输入在 HTTP 层已经校验过，这里不再重复校验。
pub struct ReviewOrchestrator {
    sentiment: Arc<dyn SentimentAnalyzer>,
    key_points: Arc<dyn KeyPointAnalyzer>,
    store: Arc<dyn ReviewStore>,
    mode: AnalysisMode,
}

impl ReviewOrchestrator {
    pub fn new(
        sentiment: Arc<dyn SentimentAnalyzer>,
        key_points: Arc<dyn KeyPointAnalyzer>,
        store: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            sentiment,
            key_points,
            store,
            mode: AnalysisMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<dyn ReviewStore> {
        &self.store
    }

    /// 分析并保存一条评论
    ///
    /// AI 调用失败不会中断流程；只有存储失败会返回错误，且不重试。
    pub async fn create_review(&self, product_name: &str, review_text: &str) -> Result<Review> {
        let request_id = Uuid::new_v4();
        let span = info_span!("create_review", %request_id, product = %product_name);

        async move {
            let (sentiment, key_points) = match self.mode {
                AnalysisMode::Sequential => {
                    let sentiment = self.classify(review_text).await;
                    let key_points = self.extract(review_text, product_name).await;
                    (sentiment, key_points)
                }
                AnalysisMode::Concurrent => tokio::join!(
                    self.classify(review_text),
                    self.extract(review_text, product_name)
                ),
            };

            let record = NewReview::new(product_name, review_text, sentiment, key_points);
            let review = self
                .store
                .create(record)
                .await
                .context("Failed to save review")?;

            info!(review_id = review.id, sentiment = %review.sentiment, "Review saved");
            Ok(review)
        }
        .instrument(span)
        .await
    }

    async fn classify(&self, review_text: &str) -> SentimentResult {
        let timer = StageTimer::start("sentiment");
        let outcome = self.sentiment.classify(review_text).await;
        timer.finish(outcome.is_fallback());
        outcome.into_value()
    }

    async fn extract(&self, review_text: &str, product_name: &str) -> Vec<String> {
        let timer = StageTimer::start("key_points");
        let outcome = self.key_points.extract(review_text, product_name).await;
        timer.finish(outcome.is_fallback());
        outcome.into_value()
    }
}
