pub mod review;

pub use review::{
    NewReview, Review, ReviewPage, SentimentResult, PRODUCT_NAME_MAX_CHARS, REVIEW_TEXT_MIN_CHARS,
};

#[cfg(test)]
mod tests;
