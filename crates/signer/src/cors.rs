//! # CORS
//!
//! ブラウザから直接呼ばれるため、全レスポンスに許可的なCORSヘッダを付与する。
//! プリフライト（OPTIONS）は業務ロジックを通さず空の200で応答する。

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;

/// 許可するリクエストヘッダ
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// 許可するメソッド
pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS";

/// プリフライト応答。ボディは空。
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

/// レスポンスにCORSヘッダを付与する。エラーレスポンスも対象。
pub async fn apply_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}
