use crate::infrastructure::error::ReviewError;

/// AI 调用结果
///
/// 外部服务失败时不会向上抛错，而是携带一个确定的降级值，
/// 同时保留导致降级的原因供日志使用。
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis<T> {
    /// 外部服务给出了有效结果
    Completed(T),
    /// 使用降级值
    Fallback { value: T, cause: ReviewError },
}

impl<T> Analysis<T> {
    pub fn fallback(value: T, cause: ReviewError) -> Self {
        Analysis::Fallback { value, cause }
    }

    pub fn value(&self) -> &T {
        match self {
            Analysis::Completed(value) => value,
            Analysis::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Analysis::Completed(value) => value,
            Analysis::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Analysis::Fallback { .. })
    }

    pub fn cause(&self) -> Option<&ReviewError> {
        match self {
            Analysis::Completed(_) => None,
            Analysis::Fallback { cause, .. } => Some(cause),
        }
    }
}
