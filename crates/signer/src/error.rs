//! # 署名付きURLサービス エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! Displayの文字列はそのままレスポンスの `error` フィールドになる。

use axum::http::{header, HeaderValue, StatusCode};
use axum::Json;
use stayhub_types::{ErrorBody, ErrorCode};

/// 内部エラー時に返すRetry-After（秒）
pub const INTERNAL_RETRY_AFTER_SECS: &str = "5";

/// 署名付きURLサービスのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// ボディがJSONでない、または `path` が文字列でない
    #[error("Invalid path parameter")]
    InvalidPathParameter,
    /// Authorizationヘッダがない
    #[error("Missing authorization header")]
    MissingAuthorization,
    /// 資格情報をIDプロバイダで解決できない
    #[error("Unauthorized")]
    Unauthorized,
    /// 管理者権限がない、または権限確認に失敗
    #[error("Admin access required")]
    AdminRequired,
    /// サニタイズ後のパスが許可プレフィックス外
    #[error("Invalid path")]
    PathNotAllowed,
    /// 上流呼び出しが期限内に完了しなかった
    #[error("Upstream call timed out: {0}")]
    DeadlineExceeded(&'static str),
    /// 署名処理に失敗
    #[error("{0}")]
    Storage(String),
    /// 内部エラー（設定不備、上流の予期しない応答）
    #[error("{0}")]
    Internal(String),
}

impl SignerError {
    /// 対応するHTTPステータス
    pub fn status(&self) -> StatusCode {
        match self {
            SignerError::InvalidPathParameter => StatusCode::BAD_REQUEST,
            SignerError::MissingAuthorization | SignerError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            SignerError::AdminRequired | SignerError::PathNotAllowed => StatusCode::FORBIDDEN,
            SignerError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            SignerError::Storage(_) | SignerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 機械判定用コード
    pub fn code(&self) -> ErrorCode {
        match self {
            SignerError::InvalidPathParameter => ErrorCode::BadRequest,
            SignerError::MissingAuthorization => ErrorCode::MissingAuthorization,
            SignerError::Unauthorized => ErrorCode::Unauthorized,
            SignerError::AdminRequired => ErrorCode::AdminRequired,
            SignerError::PathNotAllowed => ErrorCode::PathNotAllowed,
            SignerError::DeadlineExceeded(_) => ErrorCode::DeadlineExceeded,
            SignerError::Storage(_) | SignerError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl axum::response::IntoResponse for SignerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            code: Some(self.code()),
        };
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(INTERNAL_RETRY_AFTER_SECS),
            );
        }
        response
    }
}
