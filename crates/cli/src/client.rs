//! # 署名付きURLサービス クライアント
//!
//! 稼働中のサービスに署名付きURLを要求し、そのURLでオブジェクトを取得する。

use stayhub_types::{ErrorBody, SignedUrlRequest, SignedUrlResponse};

/// CLIのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// サービスへの送信に失敗
    #[error("サービスへの送信に失敗: {0}")]
    Transport(#[from] reqwest::Error),
    /// サービスがリクエストを拒否
    #[error("サービスが拒否しました: HTTP {status} - {message}")]
    Rejected { status: u16, message: String },
    /// オブジェクト取得に失敗
    #[error("オブジェクト取得でHTTPエラー: ステータス {0}")]
    Download(u16),
}

/// サービスの `/get-signed-url` に署名付きURLを要求する。
pub async fn request_signed_url(
    http_client: &reqwest::Client,
    endpoint: &str,
    token: &str,
    path: &str,
) -> Result<String, CliError> {
    let url = format!("{}/get-signed-url", endpoint.trim_end_matches('/'));
    let response = http_client
        .post(&url)
        .bearer_auth(token)
        .json(&SignedUrlRequest {
            path: path.to_string(),
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await?;
        // 構造化エラーでなければ本文をそのまま表示する
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => match body.code {
                Some(code) => format!("{} ({code})", body.error),
                None => body.error,
            },
            Err(_) => text,
        };
        return Err(CliError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let body: SignedUrlResponse = response.json().await?;
    Ok(body.url)
}

/// 署名付きURLでオブジェクトを取得する。
pub async fn download(http_client: &reqwest::Client, signed_url: &str) -> Result<Vec<u8>, CliError> {
    let response = http_client.get(signed_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Download(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}
