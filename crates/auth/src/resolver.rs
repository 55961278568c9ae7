//! 两种可互换的认证策略收拢在一个能力对象后面。
//!
//! 策略在启动时由配置选定一次，绝不按请求混用。畸形或过期的令牌
//! 一律硬落回匿名，不升级、不报错。

use std::time::Duration;

use domain::Principal;

use crate::session::SessionStore;
use crate::token::TokenSigner;

#[derive(Clone)]
pub enum PrincipalResolver {
    /// 服务端会话：随机令牌指向会话存储，滑动空闲超时。
    Session(SessionStore),
    /// 签名承载令牌：声明内嵌，离线验证，无存储查找。
    Bearer(TokenSigner),
}

impl PrincipalResolver {
    pub fn session(idle_timeout: Duration) -> Self {
        PrincipalResolver::Session(SessionStore::new(idle_timeout))
    }

    pub fn bearer(secret: &str, ttl_secs: i64) -> Self {
        PrincipalResolver::Bearer(TokenSigner::new(secret, ttl_secs))
    }

    /// 登录成功后为主体签发令牌（Anonymous → Authenticated 的唯一入口）。
    pub fn issue(&self, principal: Principal) -> String {
        match self {
            PrincipalResolver::Session(store) => store.issue(principal),
            PrincipalResolver::Bearer(signer) => signer.sign(&principal),
        }
    }

    /// 把请求携带的令牌解析为主体；拿不到就是匿名。
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        match self {
            PrincipalResolver::Session(store) => store.resolve(token),
            PrincipalResolver::Bearer(signer) => signer.verify(token),
        }
    }

    /// Authenticated → Anonymous。承载令牌模式下登出是建议性的：
    /// 核心不设吊销名单，由调用方丢弃令牌。
    pub fn logout(&self, token: &str) {
        match self {
            PrincipalResolver::Session(store) => store.clear(token),
            PrincipalResolver::Bearer(_) => {
                tracing::debug!("bearer logout is advisory; client discards the token");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 5,
            username: "carol".into(),
            email: "carol@example.com".into(),
        }
    }

    #[test]
    fn session_mode_round_trip_and_logout() {
        let resolver = PrincipalResolver::session(Duration::from_secs(60));
        let token = resolver.issue(principal());
        assert_eq!(resolver.resolve(&token), Some(principal()));

        resolver.logout(&token);
        assert_eq!(resolver.resolve(&token), None);
    }

    #[test]
    fn bearer_mode_round_trip_is_stateless() {
        let resolver = PrincipalResolver::bearer("secret", 3600);
        let token = resolver.issue(principal());
        assert_eq!(resolver.resolve(&token), Some(principal()));

        // 建议性登出：令牌在核心侧依然可验
        resolver.logout(&token);
        assert_eq!(resolver.resolve(&token), Some(principal()));
    }

    #[test]
    fn garbage_tokens_are_anonymous_in_both_modes() {
        for resolver in [
            PrincipalResolver::session(Duration::from_secs(60)),
            PrincipalResolver::bearer("secret", 3600),
        ] {
            assert_eq!(resolver.resolve(""), None);
            assert_eq!(resolver.resolve("garbage"), None);
        }
    }
}
