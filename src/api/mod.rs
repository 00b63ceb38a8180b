//! REST 接口层
//!
//! 只负责请求解析、参数校验和错误到状态码的映射，业务逻辑在 `review` 模块中。

pub mod cors;
pub mod error;
pub mod extractors;
mod handlers;
pub mod router;
pub mod types;
pub mod validation;

pub use error::ServerError;
pub use router::create_router;
pub use types::{AiServiceStatus, AppState};
