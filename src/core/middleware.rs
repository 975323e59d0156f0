//! 核心中间件模块

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::error::ErrorResponse;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 请求日志中间件
///
/// 沿用客户端传入的 `x-request-id`，没有则生成一个 UUID，并回写到响应头。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    info!(
        request_id = %request_id,
        "{} {} - {} - {}ms",
        method,
        uri,
        status,
        duration.as_millis()
    );

    response
}

/// 框架自身产生的错误响应（405、超时 408 等）没有响应体，统一补成 `{"error": "..."}`
///
/// 已经带 `Content-Type` 的响应（处理器返回的 `CoreError`）原样放行。
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let message = match status {
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        _ => status.canonical_reason().unwrap_or("Request failed"),
    };

    let (parts, _) = response.into_parts();
    let mut json = (status, Json(ErrorResponse { error: message.to_string() })).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_LENGTH {
            json.headers_mut().append(name.clone(), value.clone());
        }
    }
    json
}
