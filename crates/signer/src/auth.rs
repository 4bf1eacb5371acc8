//! # 認証・認可
//!
//! 呼び出し元の資格情報をIDプロバイダで解決し（認証）、
//! 解決したユーザーが管理者権限を持つかを判定元に問い合わせる（認可）。
//!
//! 権限は資格情報に埋め込まれたクレームからは推測しない。
//! 発行後に権限が変わり得るため、リクエストごとに判定元へ問い合わせる。

use std::fmt;

use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::error::SignerError;

/// 解決済みの呼び出し元。リクエストの処理中のみ保持する。
#[derive(Clone)]
pub struct Identity {
    /// ユーザーID
    pub id: String,
    /// メールアドレス（IDプロバイダが返した場合）
    pub email: Option<String>,
    /// 解決に使ったBearer資格情報。判定元への問い合わせに再利用する。
    pub credential: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Authorizationヘッダから資格情報を取り出す。
///
/// - ヘッダなし、または値が空白のみ → `MissingAuthorization`
/// - `Bearer <token>` 形式でない、またはトークンが空 → `Unauthorized`
pub fn bearer_credential(headers: &HeaderMap) -> Result<&str, SignerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(SignerError::MissingAuthorization)?;
    let value = value.to_str().map_err(|_| SignerError::Unauthorized)?.trim();
    if value.is_empty() {
        return Err(SignerError::MissingAuthorization);
    }

    let (scheme, token) = value.split_once(' ').ok_or(SignerError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(SignerError::Unauthorized);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(SignerError::Unauthorized);
    }
    Ok(token)
}

// ---------------------------------------------------------------------------
// トレイト
// ---------------------------------------------------------------------------

/// 資格情報をユーザーに解決するIDプロバイダ。
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 資格情報を解決する。解決できない場合は `Unauthorized`。
    async fn resolve_identity(&self, credential: &str) -> Result<Identity, SignerError>;
}

/// 管理者権限の判定元。
#[async_trait::async_trait]
pub trait AuthorizationOracle: Send + Sync {
    /// `identity` が管理者権限を持つかを返す。
    async fn is_admin(&self, identity: &Identity) -> Result<bool, SignerError>;
}

// ---------------------------------------------------------------------------
// Supabase実装
// ---------------------------------------------------------------------------

/// `GET /auth/v1/user` のレスポンス（必要なフィールドのみ）
#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Option<String>,
    email: Option<String>,
}

/// reqwestのエラーを分類する。タイムアウトは期限切れとして扱う。
fn classify_transport_error(upstream: &'static str, e: reqwest::Error) -> SignerError {
    if e.is_timeout() {
        SignerError::DeadlineExceeded(upstream)
    } else {
        SignerError::Internal(format!("{upstream}への送信に失敗: {e}"))
    }
}

/// Supabase Auth によるIDプロバイダ実装。
pub struct SupabaseIdentityProvider {
    http_client: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(http_client: reqwest::Client, auth_url: &str, anon_key: &str) -> Self {
        Self {
            http_client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn resolve_identity(&self, credential: &str) -> Result<Identity, SignerError> {
        let url = format!("{}/auth/v1/user", self.auth_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(credential)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| classify_transport_error("identity provider", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "IDプロバイダが資格情報を拒否しました");
            return Err(SignerError::Unauthorized);
        }

        let user: UserRecord = response
            .json()
            .await
            .map_err(|e| SignerError::Internal(format!("ユーザー情報のパースに失敗: {e}")))?;

        match user.id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(Identity {
                id,
                email: user.email,
                credential: credential.to_string(),
            }),
            None => Err(SignerError::Unauthorized),
        }
    }
}

/// Supabase RPC（Postgres関数）による管理者判定。
///
/// 呼び出し元の資格情報でRPCを呼び、ユーザーIDを明示的な引数
/// `user_id` として渡す。関数はJSONの真偽値を返す。
pub struct SupabaseAdminOracle {
    http_client: reqwest::Client,
    auth_url: String,
    anon_key: String,
    function: String,
}

impl SupabaseAdminOracle {
    pub fn new(http_client: reqwest::Client, auth_url: &str, anon_key: &str, function: &str) -> Self {
        Self {
            http_client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            function: function.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl AuthorizationOracle for SupabaseAdminOracle {
    async fn is_admin(&self, identity: &Identity) -> Result<bool, SignerError> {
        let url = format!("{}/rest/v1/rpc/{}", self.auth_url, self.function);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&identity.credential)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "user_id": identity.id }))
            .send()
            .await
            .map_err(|e| classify_transport_error("authorization oracle", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SignerError::Internal(format!("権限判定レスポンスの読み取りに失敗: {e}")))?;

        if !status.is_success() {
            return Err(SignerError::Internal(format!(
                "権限判定がエラーを返しました: HTTP {status} - {body}"
            )));
        }

        serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.as_bool())
            .ok_or_else(|| SignerError::Internal(format!("権限判定の結果が真偽値ではありません: {body}")))
    }
}
