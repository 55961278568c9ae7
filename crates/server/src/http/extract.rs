use auth::PrincipalResolver;
use axum::http::{header, HeaderMap};
use domain::Principal;

/// `Authorization: Bearer <token>` 里的令牌；两种策略共用同一携带方式。
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// 解析当前请求的主体；缺失、畸形、过期一律按匿名处理，
/// 让调用方统一以 Option 分支。
pub fn current_principal(headers: &HeaderMap, resolver: &PrincipalResolver) -> Option<Principal> {
    bearer_token(headers).and_then(|t| resolver.resolve(t))
}
