//! 请求参数校验

use crate::infrastructure::error::{ReviewError, ReviewResult};
use crate::models::{PRODUCT_NAME_MAX_CHARS, REVIEW_TEXT_MIN_CHARS};
use crate::storage::ListQuery;

use super::types::{AnalyzeReviewPayload, ListReviewsParams};

pub const REQUIRED_FIELDS_MESSAGE: &str = "product_name and review_text are required";
pub const INVALID_ID_MESSAGE: &str = "Invalid review ID";
pub const INVALID_PAGINATION_MESSAGE: &str = "limit and offset must be non-negative integers";

/// 校验通过、已去除首尾空白的评论输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReview {
    pub product_name: String,
    pub review_text: String,
}

/// 校验分析请求
///
/// 长度按字符数计算，校验前先去掉首尾空白。
pub fn validate_review_payload(payload: AnalyzeReviewPayload) -> ReviewResult<ValidatedReview> {
    let (product_name, review_text) = match (payload.product_name, payload.review_text) {
        (Some(name), Some(text)) => (name.trim().to_string(), text.trim().to_string()),
        _ => return Err(ReviewError::validation(REQUIRED_FIELDS_MESSAGE, None)),
    };

    if product_name.is_empty() {
        return Err(ReviewError::validation(
            "product_name cannot be empty",
            Some("product_name"),
        ));
    }
    if product_name.chars().count() > PRODUCT_NAME_MAX_CHARS {
        return Err(ReviewError::validation(
            format!("product_name must be at most {} characters", PRODUCT_NAME_MAX_CHARS),
            Some("product_name"),
        ));
    }
    if review_text.chars().count() < REVIEW_TEXT_MIN_CHARS {
        return Err(ReviewError::validation(
            format!("review_text must be at least {} characters", REVIEW_TEXT_MIN_CHARS),
            Some("review_text"),
        ));
    }

    Ok(ValidatedReview {
        product_name,
        review_text,
    })
}

fn parse_non_negative(value: Option<&str>, default: i64) -> ReviewResult<i64> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| ReviewError::validation(INVALID_PAGINATION_MESSAGE, None)),
    }
}

/// 解析分页参数，缺省为 limit=50、offset=0
pub fn parse_list_query(params: &ListReviewsParams) -> ReviewResult<ListQuery> {
    let defaults = ListQuery::default();
    let limit = parse_non_negative(params.limit.as_deref(), defaults.limit)?;
    let offset = parse_non_negative(params.offset.as_deref(), defaults.offset)?;
    Ok(ListQuery::new(limit, offset))
}

pub fn parse_review_id(raw: &str) -> ReviewResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ReviewError::validation(INVALID_ID_MESSAGE, Some("id")))
}
