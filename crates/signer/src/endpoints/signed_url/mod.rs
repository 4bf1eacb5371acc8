//! # POST /get-signed-url
//!
//! 管理者向けに、本人確認書類等の非公開オブジェクトを読むための
//! 有効期限付き署名付きURLを発行する。
//!
//! ## 処理フロー
//! 1. Authorizationヘッダの有無を確認（上流呼び出し前に失敗させる）
//! 2. IDプロバイダで資格情報をユーザーに解決
//! 3. 判定元で管理者権限を確認
//! 4. ボディの `path` を検証
//! 5. `..` と先頭の `/` を除去
//! 6. 許可プレフィックスを確認
//! 7. 900秒有効の署名付きGET URLを生成
//!
//! 各ステップは前のステップの結果に依存するため並列化しない。

mod handler;


pub use handler::handle_get_signed_url;
