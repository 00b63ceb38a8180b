use super::*;
use chrono::{TimeZone, Utc};

#[test]
fn test_neutral_sentiment() {
    let neutral = SentimentResult::neutral();
    assert_eq!(neutral.sentiment, "neutral");
    assert_eq!(neutral.score, 0.5);
}

#[test]
fn test_new_review_from_sentiment() {
    let review = NewReview::new(
        "Widget",
        "This product broke after two days of use",
        SentimentResult::new("negative", 0.9731),
        vec!["Poor durability".to_string()],
    );

    assert_eq!(review.sentiment, "negative");
    assert_eq!(review.sentiment_score, 0.9731);
    assert_eq!(review.key_points, vec!["Poor durability"]);
}

#[test]
fn test_into_review_assigns_identity() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let review = NewReview::new("Widget", "Works as advertised", SentimentResult::neutral(), vec![])
        .into_review(7, created_at);

    assert_eq!(review.id, 7);
    assert_eq!(review.created_at, created_at);
    assert_eq!(review.product_name, "Widget");
}

#[test]
fn test_review_wire_format() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let review = NewReview::new(
        "Widget",
        "Works as advertised",
        SentimentResult::new("positive", 0.88),
        vec!["Reliable".to_string(), "Good value".to_string()],
    )
    .into_review(1, created_at);

    let json = serde_json::to_value(&review).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["sentiment"], "positive");
    assert_eq!(json["sentiment_score"], 0.88);
    assert_eq!(json["key_points"][1], "Good value");
    assert_eq!(json["created_at"], "2024-05-01T12:30:00Z");
}
