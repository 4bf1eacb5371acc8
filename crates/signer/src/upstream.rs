//! # 上流呼び出しの期限
//!
//! IDプロバイダ・権限判定・署名器への呼び出しに個別の期限を付ける。
//! 期限切れは `DeadlineExceeded` として `Internal` と区別する。

use std::future::Future;
use std::time::Duration;

use crate::error::SignerError;

/// `fut` を `limit` 以内に完了させる。
pub async fn with_deadline<T, F>(
    limit: Duration,
    upstream: &'static str,
    fut: F,
) -> Result<T, SignerError>
where
    F: Future<Output = Result<T, SignerError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                upstream,
                timeout_ms = limit.as_millis() as u64,
                "上流呼び出しがタイムアウトしました"
            );
            Err(SignerError::DeadlineExceeded(upstream))
        }
    }
}
