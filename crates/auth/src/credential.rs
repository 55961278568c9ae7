//! 口令凭证编解码：`$<算法标签>$<盐>$<摘要>`，盐与摘要为 base64。
//!
//! 校验按记录里存的标签分发，而不是按全局配置——历史记录用旧方案写入，
//! 引入更强方案后仍需可验。任何解析失败都只是验证失败，绝不向调用方抛错。
//! 秘密、盐、摘要一律不进日志。

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;
type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;
const TAG_CURRENT: &str = "hmac-sha512";
const TAG_LEGACY: &str = "hmac-sha256";

/// 每次调用生成全新随机盐，两次对同一秘密的调用产出不同记录。
pub fn hash(secret: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive_sha512(&salt, secret);
    encode_record(TAG_CURRENT, &salt, &digest)
}

/// 按存储的算法标签重算摘要并做常数时间比较。
pub fn verify(secret: &str, record: &str) -> bool {
    let Some((tag, salt, digest)) = parse_record(record) else {
        return false;
    };
    match tag {
        TAG_CURRENT => {
            let mut mac = mac_512(&salt);
            mac.update(secret.as_bytes());
            mac.verify_slice(&digest).is_ok()
        }
        TAG_LEGACY => {
            let mut mac = mac_256(&salt);
            mac.update(secret.as_bytes());
            mac.verify_slice(&digest).is_ok()
        }
        _ => false,
    }
}

fn encode_record(tag: &str, salt: &[u8], digest: &[u8]) -> String {
    format!("${}${}${}", tag, B64.encode(salt), B64.encode(digest))
}

fn parse_record(record: &str) -> Option<(&str, Vec<u8>, Vec<u8>)> {
    let mut parts = record.split('$');
    if !parts.next()?.is_empty() {
        return None;
    }
    let tag = parts.next()?;
    let salt = B64.decode(parts.next()?).ok()?;
    let digest = B64.decode(parts.next()?).ok()?;
    if parts.next().is_some() || salt.is_empty() {
        return None;
    }
    Some((tag, salt, digest))
}

fn derive_sha512(salt: &[u8], secret: &str) -> Vec<u8> {
    let mut mac = mac_512(salt);
    mac.update(secret.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

// HMAC 对任意密钥长度都成立，此处不可能失败
fn mac_512(salt: &[u8]) -> HmacSha512 {
    HmacSha512::new_from_slice(salt).expect("hmac accepts any key length")
}

fn mac_256(salt: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(salt).expect("hmac accepts any key length")
}
