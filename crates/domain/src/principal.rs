use serde::{Deserialize, Serialize};

/// 一次请求关联的已认证身份。匿名请求以 `Option<Principal>` 的 None 表达。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub email: String,
}
