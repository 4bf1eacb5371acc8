//! # StayHub 署名付きURLサービス
//!
//! 管理者が本人確認書類等の非公開オブジェクトを閲覧するための、
//! 有効期限付き署名付きURLを発行する。
//!
//! ## 役割
//! - 呼び出し元の認証（IDプロバイダ）
//! - 管理者権限の確認（リクエストごとに判定元へ問い合わせ）
//! - オブジェクトパスのサニタイズと許可プレフィックス判定
//! - S3互換ストレージの署名付きGET URL発行（900秒）
//!
//! ## API エンドポイント
//! - `POST /get-signed-url` — 署名付きURL発行
//! - `OPTIONS /get-signed-url` — CORSプリフライト
//! - `GET /health` — サービス情報公開

mod auth;
mod config;
mod cors;
mod endpoints;
mod error;
mod router;
mod storage;
mod upstream;

use std::sync::Arc;

use auth::{SupabaseAdminOracle, SupabaseIdentityProvider};
use config::{SignerConfig, SignerState};
use storage::ObjectSigner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // 設定は起動時に一度だけ読み込む
    let config = SignerConfig::from_env()?;
    tracing::info!(?config, "設定を読み込みました");

    // 上流呼び出しは個別の期限に加え、クライアント側でも打ち切る
    let http_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?;

    let identity = SupabaseIdentityProvider::new(
        http_client.clone(),
        &config.auth_url,
        &config.anon_key,
    );
    let oracle = SupabaseAdminOracle::new(
        http_client,
        &config.auth_url,
        &config.anon_key,
        &config.admin_check_function,
    );

    let signer = build_signer(&config)?;

    let state = Arc::new(SignerState {
        identity: Box::new(identity),
        oracle: Box::new(oracle),
        signer,
        upstream_timeout: config.upstream_timeout,
    });

    let app = router::build_router(state);

    tracing::info!("署名付きURLサービスを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "vendor-s3")]
fn build_signer(config: &SignerConfig) -> anyhow::Result<Box<dyn ObjectSigner>> {
    Ok(Box::new(storage::S3ObjectSigner::from_config(config)?))
}

#[cfg(not(feature = "vendor-s3"))]
fn build_signer(_config: &SignerConfig) -> anyhow::Result<Box<dyn ObjectSigner>> {
    anyhow::bail!("署名器の実装がありません。vendor-s3 featureを有効にしてください")
}
