//! HTTP 中间件
//! 应用状态与请求追踪

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// AppState 内部使用 Arc 包装服务,这样:
/// 1. 多个请求可以共享服务实例
/// 2. Clone 成本低廉(Arc 是指针拷贝)
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::AppConfig,
    pub db: sqlx::PgPool,
    pub user_service: Arc<crate::services::UserService>,
    pub token_service: Arc<crate::auth::token::TokenService>,
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    // 生成或提取 trace_id/request_id
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().to_string();

    // 创建 span
    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        // 继续处理请求
        let response = next.run(req).await;

        let elapsed = start.elapsed();

        // 记录指标 - 使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            400 => "400",
            401 => "401",
            404 => "404",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        // 记录日志
        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        let mut response = response;
        if let Ok(value) = trace_id.parse() {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
