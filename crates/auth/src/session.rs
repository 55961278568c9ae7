//! 服务端会话存储：随机令牌 → 会话记录，滑动空闲超时。
//!
//! 每次成功解析都会把截止时间向后推一个空闲窗口；超时即逐出。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64URL, Engine};
use domain::Principal;
use rand::RngCore;

struct SessionRecord {
    principal: Principal,
    expires_at: SystemTime,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// 签发一个 256 位随机令牌并登记会话。
    pub fn issue(&self, principal: Principal) -> String {
        self.issue_at(principal, SystemTime::now())
    }

    fn issue_at(&self, principal: Principal, now: SystemTime) -> String {
        let mut buf = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut buf);
        let token = B64URL.encode(buf);

        let mut map = self.sessions.lock().unwrap();
        map.insert(
            token.clone(),
            SessionRecord {
                principal,
                expires_at: now + self.idle_timeout,
            },
        );
        token
    }

    /// 查找会话；命中则顺带刷新空闲截止时间（滑动续期），过期则逐出。
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        self.resolve_at(token, SystemTime::now())
    }

    fn resolve_at(&self, token: &str, now: SystemTime) -> Option<Principal> {
        let mut map = self.sessions.lock().unwrap();
        match map.get_mut(token) {
            Some(record) if record.expires_at > now => {
                record.expires_at = now + self.idle_timeout;
                Some(record.principal.clone())
            }
            Some(_) => {
                map.remove(token);
                None
            }
            None => None,
        }
    }

    /// 登出：移除会话记录。未知令牌是安静的 no-op。
    pub fn clear(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }

    /// 后台清理：逐出所有已过空闲窗口的记录。
    pub fn sweep(&self) {
        let now = SystemTime::now();
        self.sessions
            .lock()
            .unwrap()
            .retain(|_, r| r.expires_at > now);
    }
}
