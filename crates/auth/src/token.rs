//! 自包含的签名承载令牌：`b64url(header).b64url(claims).b64url(sig)`。
//!
//! 声明里直接嵌入用户 id/用户名/邮箱，验签 + 验期后即信任，不查任何存储。
//! 核心不维护吊销名单，登出只是建议性的（调用方丢弃令牌）。

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64URL, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use domain::Principal;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_secs,
        }
    }

    pub fn sign(&self, principal: &Principal) -> String {
        self.sign_at(principal, Utc::now().timestamp())
    }

    fn sign_at(&self, principal: &Principal, now: i64) -> String {
        let header = Header { alg: "HS256".into(), typ: "JWT".into() };
        let claims = Claims {
            sub: principal.id,
            name: principal.username.clone(),
            email: principal.email.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        // 结构体序列化为 JSON 不会失败
        let header_json = serde_json::to_vec(&header).expect("header serializes");
        let claims_json = serde_json::to_vec(&claims).expect("claims serialize");

        let signing_input = format!("{}.{}", B64URL.encode(header_json), B64URL.encode(claims_json));
        let sig = self.mac_over(signing_input.as_bytes());
        format!("{}.{}", signing_input, B64URL.encode(sig))
    }

    /// 验签并检查有效期；任何畸形、篡改或过期的令牌都落回 None（匿名），
    /// 而不是错误，让调用方统一以"是否有主体"分支。
    pub fn verify(&self, token: &str) -> Option<Principal> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Option<Principal> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, sig_b64) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let sig = B64URL.decode(sig_b64).ok()?;
        let mut mac = self.mac(signing_input.as_bytes());
        mac.verify_slice(&sig).ok()?;

        let header: Header = serde_json::from_slice(&B64URL.decode(header_b64).ok()?).ok()?;
        if header.alg != "HS256" {
            return None;
        }
        let claims: Claims = serde_json::from_slice(&B64URL.decode(claims_b64).ok()?).ok()?;
        if claims.exp <= now {
            return None;
        }

        Some(Principal {
            id: claims.sub,
            username: claims.name,
            email: claims.email,
        })
    }

    fn mac(&self, input: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length");
        mac.update(input);
        mac
    }

    fn mac_over(&self, input: &[u8]) -> Vec<u8> {
        self.mac(input).finalize().into_bytes().to_vec()
    }
}
