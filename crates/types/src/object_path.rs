//! # オブジェクトパスポリシー
//!
//! クライアントが指定したオブジェクトパスをサニタイズし、
//! 許可プレフィックスに含まれるかを判定する。
//!
//! ## 処理順序
//! 1. `..` をすべて除去（左から1パス）
//! 2. 先頭の `/` をすべて除去
//! 3. サニタイズ後の値に対してプレフィックス判定
//!
//! 完全な正規化ではなく拒否リスト方式。プレフィックスは末尾の `/` を含めて
//! 比較するため、`id-verification-evil/` のような紛らわしいパスは一致しない。

use std::fmt;

/// 署名を許可するパスプレフィックス。末尾の `/` は必須。
pub const ALLOWED_PREFIXES: &[&str] = &["id-verification/"];

/// パスがプレフィックス判定で拒否された。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("許可されていないパス: {sanitized}")]
pub struct PathRejected {
    /// 判定に使ったサニタイズ後のパス
    pub sanitized: String,
}

/// `..` を除去し、先頭の `/` を取り除く。
///
/// 左から重ならない出現を1回の走査で除去する。除去後に前後が連結されても
/// 新たな `..` は生じない（直前の文字が `.` なら、その位置から一致していたため）。
pub fn sanitize_object_path(raw: &str) -> String {
    raw.replace("..", "").trim_start_matches('/').to_string()
}

/// サニタイズ済みかつ許可プレフィックス内のオブジェクトパス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    key: String,
    prefix: &'static str,
}

impl ObjectPath {
    /// 生のパスをサニタイズし、[`ALLOWED_PREFIXES`] で判定する。
    pub fn parse(raw: &str) -> Result<Self, PathRejected> {
        Self::parse_with(raw, ALLOWED_PREFIXES)
    }

    /// 任意の許可リストで判定する。
    pub fn parse_with(raw: &str, allowed: &[&'static str]) -> Result<Self, PathRejected> {
        let sanitized = sanitize_object_path(raw);
        match allowed.iter().find(|p| sanitized.starts_with(**p)) {
            Some(prefix) => Ok(Self {
                key: sanitized,
                prefix,
            }),
            None => Err(PathRejected { sanitized }),
        }
    }

    /// バケット内のオブジェクトキー
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// 一致した許可プレフィックス
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_strips_traversal_and_leading_slashes() {
        assert_eq!(
            sanitize_object_path("id-verification/../../secrets/key.pem"),
            "id-verification///secrets/key.pem"
        );
        assert_eq!(sanitize_object_path("///id-verification/a.png"), "id-verification/a.png");
        assert_eq!(sanitize_object_path("../../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize_object_path("/../id-verification/x"), "id-verification/x");
        assert_eq!(sanitize_object_path("a...b"), "a.b");
        assert_eq!(sanitize_object_path("...."), "");
    }

    #[test]
    fn test_parse_accepts_allowlisted_path() {
        let path = ObjectPath::parse("id-verification/user123/doc.png").unwrap();
        assert_eq!(path.as_str(), "id-verification/user123/doc.png");
        assert_eq!(path.prefix(), "id-verification/");
    }

    /// プレフィックス判定は生の値ではなくサニタイズ後の値で行う
    #[test]
    fn test_parse_checks_sanitized_value() {
        let path = ObjectPath::parse("/../id-verification/doc.png").unwrap();
        assert_eq!(path.as_str(), "id-verification/doc.png");

        let path = ObjectPath::parse("id-verification/../../secrets").unwrap();
        assert_eq!(path.as_str(), "id-verification///secrets");

        let path = ObjectPath::parse("..id-verification/doc.png").unwrap();
        assert_eq!(path.as_str(), "id-verification/doc.png");

        // 生の値は一致しないが、サニタイズ後は一致する
        let path = ObjectPath::parse("id-veri..fication/doc.png").unwrap();
        assert_eq!(path.as_str(), "id-verification/doc.png");
    }

    #[test]
    fn test_parse_rejects_outside_prefix() {
        let err = ObjectPath::parse("avatars/user123.png").unwrap_err();
        assert_eq!(err.sanitized, "avatars/user123.png");

        // 末尾の `/` によりプレフィックスの取り違えを防ぐ
        assert!(ObjectPath::parse("id-verification-evil/doc.png").is_err());
        assert!(ObjectPath::parse("id-verification").is_err());
        assert!(ObjectPath::parse("").is_err());
    }

    #[test]
    fn test_parse_with_custom_allowlist() {
        let allowed: &[&'static str] = &["listings/", "id-verification/"];
        let path = ObjectPath::parse_with("/listings/42/cover.jpg", allowed).unwrap();
        assert_eq!(path.prefix(), "listings/");
        assert!(ObjectPath::parse_with("avatars/1.png", allowed).is_err());
    }

    proptest! {
        #[test]
        fn proptest_sanitized_has_no_traversal_or_leading_slash(raw in "[./a-z]{0,40}") {
            let sanitized = sanitize_object_path(&raw);
            prop_assert!(!sanitized.contains(".."));
            prop_assert!(!sanitized.starts_with('/'));
        }

        #[test]
        fn proptest_accepted_paths_start_with_prefix(raw in "(/|\\.\\.|id-verification/|[a-z]){0,12}") {
            match ObjectPath::parse(&raw) {
                Ok(path) => {
                    prop_assert!(path.as_str().starts_with("id-verification/"));
                    prop_assert!(!path.as_str().contains(".."));
                    prop_assert_eq!(path.as_str(), sanitize_object_path(&raw));
                }
                Err(rejected) => {
                    prop_assert!(!rejected.sanitized.starts_with("id-verification/"));
                }
            }
        }
    }
}
