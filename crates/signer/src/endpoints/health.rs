//! # GET /health
//!
//! サービス情報公開エンドポイント。上流は呼ばない。

use axum::Json;
use stayhub_types::{ServiceInfo, ALLOWED_PREFIXES, SIGNED_URL_EXPIRY_SECS};

/// GET /health — 許可プレフィックスと有効期限を返す。
pub async fn handle_health() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok".to_string(),
        allowed_prefixes: ALLOWED_PREFIXES.iter().map(|p| p.to_string()).collect(),
        expiry_secs: SIGNED_URL_EXPIRY_SECS,
    })
}
