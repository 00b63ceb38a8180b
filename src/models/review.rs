use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 商品名称最大字符数
pub const PRODUCT_NAME_MAX_CHARS: usize = 200;

/// 评论正文最小字符数
pub const REVIEW_TEXT_MIN_CHARS: usize = 10;

/// 已持久化的商品评论
///
/// `id` 与 `created_at` 只由存储层在插入时赋值，之后不再变化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub product_name: String,
    pub review_text: String,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub key_points: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的评论记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub product_name: String,
    pub review_text: String,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub key_points: Vec<String>,
}

impl NewReview {
    pub fn new(
        product_name: impl Into<String>,
        review_text: impl Into<String>,
        sentiment: SentimentResult,
        key_points: Vec<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            review_text: review_text.into(),
            sentiment: sentiment.sentiment,
            sentiment_score: sentiment.score,
            key_points,
        }
    }

    /// 由存储层补齐主键与创建时间
    pub fn into_review(self, id: i64, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            product_name: self.product_name,
            review_text: self.review_text,
            sentiment: self.sentiment,
            sentiment_score: self.sentiment_score,
            key_points: self.key_points,
            created_at,
        }
    }
}

/// 分页查询结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total: i64,
}

/// 情感分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: String,
    pub score: f64,
}

impl SentimentResult {
    pub fn new(sentiment: impl Into<String>, score: f64) -> Self {
        Self {
            sentiment: sentiment.into(),
            score,
        }
    }

    /// 分类失败时使用的中性结果
    pub fn neutral() -> Self {
        Self::new("neutral", 0.5)
    }
}
