use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// # Summary
/// 计算请求体的十六进制 HMAC-SHA512 签名。
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// # Summary
/// 校验 webhook 签名。
///
/// # Logic
/// 1. 对原始字节重新计算 HMAC-SHA512。
/// 2. 将请求头中的十六进制签名解码后做常量时间比较。
///
/// # Invariants
/// - 密钥为空、签名为空或不是合法十六进制时一律返回 false。
pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
