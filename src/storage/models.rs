use serde::{Deserialize, Serialize};

/// 默认每页数量
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// 分页条件，按创建时间倒序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}
