//! # エンドポイントテスト用共通ヘルパー
//!
//! 呼び出し回数を数えるモック協調者と、テスト用の共有状態。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::{AuthorizationOracle, Identity, IdentityProvider};
use crate::config::SignerState;
use crate::error::SignerError;
use crate::storage::ObjectSigner;

/// モックの振る舞い。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// 成功（IDプロバイダ: 解決、判定元: true、署名器: URL発行）
    Allow,
    /// 拒否（IDプロバイダ: Unauthorized、判定元: false）
    Deny,
    /// 上流エラー
    Fail,
    /// 応答しない
    Hang,
}

/// 各協調者の呼び出し回数と、署名器に渡されたキー。
#[derive(Default)]
pub struct CallLog {
    pub identity: AtomicUsize,
    pub oracle: AtomicUsize,
    pub signer: AtomicUsize,
    pub signed_keys: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.identity.load(Ordering::SeqCst),
            self.oracle.load(Ordering::SeqCst),
            self.signer.load(Ordering::SeqCst),
        )
    }

    pub fn signed_keys(&self) -> Vec<String> {
        self.signed_keys.lock().unwrap().clone()
    }
}

pub struct MockIdentityProvider {
    behavior: Behavior,
    log: Arc<CallLog>,
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn resolve_identity(&self, credential: &str) -> Result<Identity, SignerError> {
        self.log.identity.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Allow => Ok(Identity {
                id: "admin-user".to_string(),
                email: Some("admin@example.com".to_string()),
                credential: credential.to_string(),
            }),
            Behavior::Deny => Err(SignerError::Unauthorized),
            Behavior::Fail => Err(SignerError::Internal("auth service unavailable".into())),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

pub struct MockOracle {
    behavior: Behavior,
    log: Arc<CallLog>,
}

#[async_trait::async_trait]
impl AuthorizationOracle for MockOracle {
    async fn is_admin(&self, _identity: &Identity) -> Result<bool, SignerError> {
        self.log.oracle.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Allow => Ok(true),
            Behavior::Deny => Ok(false),
            Behavior::Fail => Err(SignerError::Internal("rpc failed".into())),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

pub struct MockSigner {
    behavior: Behavior,
    log: Arc<CallLog>,
}

#[async_trait::async_trait]
impl ObjectSigner for MockSigner {
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, SignerError> {
        let n = self.log.signer.fetch_add(1, Ordering::SeqCst);
        self.log.signed_keys.lock().unwrap().push(key.to_string());
        match self.behavior {
            Behavior::Allow | Behavior::Deny => Ok(format!(
                "https://mock-storage.example.com/stayhub-private/{key}?X-Amz-Expires={expiry_secs}&X-Amz-Signature=sig{n}"
            )),
            Behavior::Fail => Err(SignerError::Storage("signing backend exploded".into())),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

/// モック協調者を組み込んだ共有状態を構築する。
pub fn mock_state(
    identity: Behavior,
    oracle: Behavior,
    signer: Behavior,
) -> (Arc<SignerState>, Arc<CallLog>) {
    let log = Arc::new(CallLog::default());
    let state = Arc::new(SignerState {
        identity: Box::new(MockIdentityProvider {
            behavior: identity,
            log: log.clone(),
        }),
        oracle: Box::new(MockOracle {
            behavior: oracle,
            log: log.clone(),
        }),
        signer: Box::new(MockSigner {
            behavior: signer,
            log: log.clone(),
        }),
        upstream_timeout: Duration::from_millis(100),
    });
    (state, log)
}

/// すべて成功するモック状態
pub fn allow_all() -> (Arc<SignerState>, Arc<CallLog>) {
    mock_state(Behavior::Allow, Behavior::Allow, Behavior::Allow)
}

/// テスト用にルーターを起動し、ベースURLを返す。
pub async fn start_router(state: Arc<SignerState>) -> String {
    let app = crate::router::build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}
