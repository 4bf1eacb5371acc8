//! # 署名付きURLサービス エンドポイント

pub mod health;
pub mod signed_url;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use health::handle_health;
pub use signed_url::handle_get_signed_url;
