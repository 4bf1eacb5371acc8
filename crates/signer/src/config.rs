//! # 署名付きURLサービス 設定・共有状態
//!
//! 環境変数からの設定読み込みとサービスの共有状態の定義。
//! 設定は起動時に一度だけ構築し、以後は変更しない。

use std::fmt;
use std::time::Duration;

use anyhow::Context;

use crate::auth::{AuthorizationOracle, IdentityProvider};
use crate::storage::ObjectSigner;

/// 上流呼び出しのデフォルト期限（秒）
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// デフォルトの待ち受けアドレス
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// 管理者判定RPCのデフォルト関数名
pub const DEFAULT_ADMIN_CHECK_FUNCTION: &str = "is_admin";

/// サービス設定。起動時に一度だけ構築する。
#[derive(Clone)]
pub struct SignerConfig {
    /// IDプロバイダ（認証・RPC）のベースURL
    pub auth_url: String,
    /// IDプロバイダの公開（anon）キー
    pub anon_key: String,
    /// オブジェクトストレージのエンドポイント
    pub storage_endpoint: String,
    /// オブジェクトストレージのアクセスキーID
    pub storage_access_key: String,
    /// オブジェクトストレージのシークレットアクセスキー
    pub storage_secret_key: String,
    /// 署名対象バケット名
    pub bucket_name: String,
    /// 管理者判定RPCの関数名
    pub admin_check_function: String,
    /// 上流呼び出し1回あたりの期限
    pub upstream_timeout: Duration,
    /// 待ち受けアドレス
    pub bind_addr: String,
}

impl SignerConfig {
    /// プロセス環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意のルックアップ関数から構築する。
    ///
    /// テストではプロセス環境を書き換えずにマップを渡す。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> anyhow::Result<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("環境変数 {name} が設定されていません"))
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("UPSTREAM_TIMEOUT_SECSが不正です: {raw}"))?;
                if secs == 0 {
                    anyhow::bail!("UPSTREAM_TIMEOUT_SECSは1以上である必要があります");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            auth_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            anon_key: required("SUPABASE_ANON_KEY")?,
            storage_endpoint: required("R2_ENDPOINT")?,
            storage_access_key: required("R2_ACCESS_KEY_ID")?,
            storage_secret_key: required("R2_SECRET_ACCESS_KEY")?,
            bucket_name: required("R2_BUCKET_NAME")?,
            admin_check_function: lookup("ADMIN_CHECK_FUNCTION")
                .unwrap_or_else(|| DEFAULT_ADMIN_CHECK_FUNCTION.to_string()),
            upstream_timeout,
            bind_addr: lookup("SIGNER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("auth_url", &self.auth_url)
            .field("anon_key", &"<redacted>")
            .field("storage_endpoint", &self.storage_endpoint)
            .field("storage_access_key", &self.storage_access_key)
            .field("storage_secret_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("admin_check_function", &self.admin_check_function)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

/// サービスの共有状態。
///
/// リクエスト間で共有するが、起動後に書き換えるフィールドはない。
pub struct SignerState {
    /// 資格情報をユーザーに解決するIDプロバイダ
    pub identity: Box<dyn IdentityProvider>,
    /// 管理者権限の判定元
    pub oracle: Box<dyn AuthorizationOracle>,
    /// オブジェクトストレージの署名器（S3互換等、トレイトで抽象化）
    pub signer: Box<dyn ObjectSigner>,
    /// 上流呼び出し1回あたりの期限
    pub upstream_timeout: Duration,
}
