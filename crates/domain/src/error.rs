use thiserror::Error;

/// 核心层的全部失败种类。所有失败以值返回给边界层，核心自身绝不中止进程。
#[derive(Debug, Error)]
pub enum Error {
    // 对未授权调用者统一返回 NotFound，避免资源枚举
    #[error("resource not found")]
    NotFound,

    #[error("authentication required")]
    Unauthorized,

    #[error("operation not permitted")]
    Forbidden,

    // 用户名/邮箱/slug 在竞态后仍然冲突
    #[error("unique constraint violated")]
    Conflict,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid credentials")]
    CredentialInvalid,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
