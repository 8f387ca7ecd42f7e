use rustls::crypto::CryptoProvider;

/// # Summary
/// 为进程安装 rustls 的 ring 加密后端。
///
/// # Logic
/// 1. 已存在进程级 Provider 时直接返回。
/// 2. 否则安装 ring；并发安装失败说明已被其他线程抢先，视为成功。
///
/// 所有 reqwest 客户端 (`rustls-no-provider`) 在构建前都必须调用本函数。
pub fn ensure_crypto_provider() {
    if CryptoProvider::get_default().is_some() {
        return;
    }
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed by another thread");
    }
}
