//! # ルーター
//!
//! エンドポイントとCORSレイヤーを組み立てる。

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use crate::config::SignerState;
use crate::cors::{apply_cors_headers, handle_preflight};
use crate::endpoints;

async fn handle_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// サービスのルーターを構築する。
pub fn build_router(state: Arc<SignerState>) -> Router {
    Router::new()
        .route(
            "/get-signed-url",
            post(endpoints::handle_get_signed_url).options(handle_preflight),
        )
        .route("/health", get(endpoints::handle_health).options(handle_preflight))
        .fallback(handle_not_found)
        .layer(axum::middleware::map_response(apply_cors_headers))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::endpoints::test_helpers::{allow_all, start_router};

    /// 未定義ルートやメソッド不一致でもCORSヘッダが付く
    #[tokio::test]
    async fn test_cors_on_unmatched_requests() {
        let (state, log) = allow_all();
        let base = start_router(state).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{base}/get-signed-url"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let response = client.get(format!("{base}/nope")).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        assert_eq!(log.counts(), (0, 0, 0));
    }
}
