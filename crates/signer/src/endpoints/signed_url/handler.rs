//! /get-signed-url ハンドラ実装

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::Instrument;

use stayhub_types::{ObjectPath, SignedUrlRequest, SignedUrlResponse, SIGNED_URL_EXPIRY_SECS};

use crate::auth::{self, Identity};
use crate::config::SignerState;
use crate::error::SignerError;
use crate::upstream::with_deadline;

/// /get-signed-url エンドポイントハンドラ。
///
/// ボディは読み取り結果ごと受け取る。サイズ超過等で読めなかった場合も
/// 認証・認可を先に済ませ、その後でJSONエラーとして返す。
pub async fn handle_get_signed_url(
    State(state): State<Arc<SignerState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SignedUrlResponse>, SignerError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("get_signed_url", %request_id);

    issue_signed_url(&state, &headers, body)
        .instrument(span)
        .await
        .map(Json)
}

/// 署名付きURLを発行する。失敗時はどの段階で拒否したかを返す。
pub async fn issue_signed_url(
    state: &SignerState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<SignedUrlResponse, SignerError> {
    // Step 1: 資格情報の有無
    let credential = auth::bearer_credential(headers).inspect_err(|e| {
        tracing::warn!(reason = %e, "資格情報がありません");
    })?;

    // Step 2: 認証
    let identity = authenticate(state, credential).await?;

    // Step 3: 認可
    authorize(state, &identity).await?;

    // Step 4: 入力の形
    let body = body.map_err(|rejection| {
        tracing::warn!(
            user_id = %identity.id,
            status = %rejection.status(),
            reason = %rejection.body_text(),
            "リクエストボディを読み取れません"
        );
        SignerError::InvalidPathParameter
    })?;
    let request = parse_request(&body).inspect_err(|_| {
        tracing::warn!(user_id = %identity.id, "リクエストボディが不正です");
    })?;

    // Step 5, 6: サニタイズと許可プレフィックス
    let path = ObjectPath::parse(&request.path).map_err(|rejected| {
        tracing::warn!(
            user_id = %identity.id,
            sanitized = %rejected.sanitized,
            "許可プレフィックス外のパスです"
        );
        SignerError::PathNotAllowed
    })?;

    // Step 7: 署名
    let url = with_deadline(
        state.upstream_timeout,
        "object signer",
        state.signer.presign_get(path.as_str(), SIGNED_URL_EXPIRY_SECS),
    )
    .await?;

    tracing::info!(
        user_id = %identity.id,
        email = identity.email.as_deref().unwrap_or("-"),
        path = %path,
        expiry_secs = SIGNED_URL_EXPIRY_SECS,
        "署名付きURLを発行しました"
    );

    Ok(SignedUrlResponse { url })
}

/// ボディを検証する。JSONオブジェクトで、`path` が空でない文字列であること。
fn parse_request(body: &[u8]) -> Result<SignedUrlRequest, SignerError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| SignerError::InvalidPathParameter)?;
    match value.get("path").and_then(|p| p.as_str()) {
        Some(path) if !path.is_empty() => Ok(SignedUrlRequest {
            path: path.to_string(),
        }),
        _ => Err(SignerError::InvalidPathParameter),
    }
}

/// IDプロバイダで資格情報を解決する。
///
/// 期限切れ以外の失敗はすべて `Unauthorized` に畳む。
async fn authenticate(state: &SignerState, credential: &str) -> Result<Identity, SignerError> {
    with_deadline(
        state.upstream_timeout,
        "identity provider",
        state.identity.resolve_identity(credential),
    )
    .await
    .map_err(|e| match e {
        SignerError::DeadlineExceeded(_) => e,
        other => {
            tracing::warn!(reason = %other, "資格情報を解決できません");
            SignerError::Unauthorized
        }
    })
}

/// 管理者権限を確認する。
///
/// 判定元のエラーは権限なしとして扱う。期限切れのみ区別して返す。
async fn authorize(state: &SignerState, identity: &Identity) -> Result<(), SignerError> {
    let verdict = with_deadline(
        state.upstream_timeout,
        "authorization oracle",
        state.oracle.is_admin(identity),
    )
    .await;

    match verdict {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!(user_id = %identity.id, "管理者権限がありません");
            Err(SignerError::AdminRequired)
        }
        Err(e @ SignerError::DeadlineExceeded(_)) => Err(e),
        Err(e) => {
            tracing::warn!(user_id = %identity.id, reason = %e, "権限判定に失敗しました");
            Err(SignerError::AdminRequired)
        }
    }
}
