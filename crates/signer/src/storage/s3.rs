//! # S3互換 署名器実装
//!
//! Cloudflare R2, AWS S3, MinIO 等のS3互換APIに対して
//! SigV4の署名付きURLを生成する。署名はローカル計算のみで、通信は発生しない。

use super::ObjectSigner;
use crate::config::SignerConfig;
use crate::error::SignerError;

/// リージョン名。R2は "auto" を要求する。
pub const STORAGE_REGION: &str = "auto";

/// S3互換ストレージによる署名器実装。
pub struct S3ObjectSigner {
    bucket: s3::Bucket,
}

impl S3ObjectSigner {
    /// S3互換バケットから構築する。
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    /// S3互換バケットを初期化する。
    ///
    /// バックエンドが仮想ホスト形式に対応しないため、パス形式でアクセスする。
    pub fn init_bucket(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        bucket_name: &str,
    ) -> anyhow::Result<s3::Bucket> {
        let region = s3::Region::Custom {
            region: STORAGE_REGION.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        };

        let credentials = s3::creds::Credentials::new(
            Some(access_key),
            Some(secret_key),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(bucket_name, region, credentials)?.with_path_style();

        Ok(*bucket)
    }

    /// サービス設定から構築する。
    pub fn from_config(config: &SignerConfig) -> anyhow::Result<Self> {
        tracing::info!(
            storage_endpoint = %config.storage_endpoint,
            bucket = %config.bucket_name,
            "オブジェクトストレージ署名器を初期化"
        );
        let bucket = Self::init_bucket(
            &config.storage_endpoint,
            &config.storage_access_key,
            &config.storage_secret_key,
            &config.bucket_name,
        )?;
        Ok(Self::new(bucket))
    }
}

#[async_trait::async_trait]
impl ObjectSigner for S3ObjectSigner {
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, SignerError> {
        self.bucket
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| SignerError::Storage(format!("署名付きURL生成失敗: {e}")))
    }
}
