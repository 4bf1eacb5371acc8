//! # StayHub 共有型定義
//!
//! 署名付きURL発行サービスとCLIが共有するワイヤ型と、
//! オブジェクトパスのサニタイズ・許可プレフィックス判定を提供する。
//!
//! ## エンコーディング規則
//! - リクエスト/レスポンスはすべてJSON
//! - エラーコードはsnake_caseの文字列

use serde::{Deserialize, Serialize};

pub mod object_path;

pub use object_path::{
    sanitize_object_path, ObjectPath, PathRejected, ALLOWED_PREFIXES,
};

/// 署名付きURLの有効期限（秒）。呼び出し側からは変更できない。
pub const SIGNED_URL_EXPIRY_SECS: u32 = 900;

// ---------------------------------------------------------------------------
// POST /get-signed-url
// ---------------------------------------------------------------------------

/// 署名付きURL発行リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    /// バケット内のオブジェクトパス（サニタイズ前の生の値）
    pub path: String,
}

/// 署名付きURL発行レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    /// 有効期限付きの署名付きGET URL
    pub url: String,
}

// ---------------------------------------------------------------------------
// エラーレスポンス
// ---------------------------------------------------------------------------

/// 機械判定用のエラーコード。
///
/// 同じHTTPステータスを共有する失敗（例: 403の権限不足とパス拒否）を
/// クライアントが区別できるようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// リクエストボディが不正
    BadRequest,
    /// Authorizationヘッダがない
    MissingAuthorization,
    /// 資格情報を解決できない
    Unauthorized,
    /// 管理者権限がない
    AdminRequired,
    /// パスが許可プレフィックス外
    PathNotAllowed,
    /// 上流呼び出しがタイムアウト
    DeadlineExceeded,
    /// 内部エラー
    Internal,
}

impl ErrorCode {
    /// ワイヤ上の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::MissingAuthorization => "missing_authorization",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::AdminRequired => "admin_required",
            ErrorCode::PathNotAllowed => "path_not_allowed",
            ErrorCode::DeadlineExceeded => "deadline_exceeded",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 全エラーレスポンスで共通のJSONボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 人間が読めるエラーメッセージ
    pub error: String,
    /// 機械判定用コード。旧クライアントのレスポンスには含まれない場合がある。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// サービス情報。秘密情報は含めない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// 常に "ok"
    pub status: String,
    /// 署名対象として許可されるパスプレフィックス
    pub allowed_prefixes: Vec<String>,
    /// 発行するURLの有効期限（秒）
    pub expiry_secs: u32,
}
