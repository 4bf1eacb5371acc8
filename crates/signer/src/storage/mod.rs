//! # オブジェクトストレージ署名器
//!
//! 署名付きGET URLを生成する抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-s3")]
pub mod s3;

#[cfg(feature = "vendor-s3")]
pub use s3::S3ObjectSigner;

use crate::error::SignerError;

/// オブジェクトストレージ署名器の抽象インターフェース。
///
/// 運用者はS3互換ストレージ（Cloudflare R2, AWS S3, MinIO等）や
/// その他のバックエンドを実装として選択できる。
#[async_trait::async_trait]
pub trait ObjectSigner: Send + Sync {
    /// `key` を読み取るための署名付きGET URLを生成する。
    ///
    /// URLの所持者は `expiry_secs` 秒間、追加の認証なしにオブジェクトを取得できる。
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, SignerError>;
}
