/// 存活探测
#[utoipa::path(
    get,
    path = "/",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务运行中", body = String, content_type = "text/plain")
    )
)]
pub async fn health() -> &'static str {
    "CryptoIQ backend is running"
}
