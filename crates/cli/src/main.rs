//! # StayHub 署名付きURL CLI
//!
//! 運用者向けのコマンドラインツール。
//!
//! ## サブコマンド
//! - `sign` — サービスに署名付きURLを要求して表示
//! - `fetch` — 署名付きURLを取得し、オブジェクトをファイルに保存
//! - `check-path` — パスポリシーをオフラインで確認

mod client;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stayhub_types::{sanitize_object_path, ObjectPath, SIGNED_URL_EXPIRY_SECS};

#[derive(Parser)]
#[command(name = "stayhub-cli", version, about = "StayHub 署名付きURL CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 署名付きURLを要求して表示する
    Sign(ServiceArgs),
    /// 署名付きURLでオブジェクトを取得してファイルに保存する
    Fetch {
        #[command(flatten)]
        service: ServiceArgs,
        /// 保存先ファイル
        #[arg(short, long)]
        output: PathBuf,
    },
    /// パスのサニタイズ結果と許可判定を表示する（通信なし）
    CheckPath {
        /// 確認するオブジェクトパス
        path: String,
    },
}

#[derive(Args)]
struct ServiceArgs {
    /// サービスのベースURL
    #[arg(long, env = "STAYHUB_SIGNER_ENDPOINT", default_value = "http://localhost:3000")]
    endpoint: String,
    /// Bearer資格情報
    #[arg(long, env = "STAYHUB_TOKEN", hide_env_values = true)]
    token: String,
    /// バケット内のオブジェクトパス
    #[arg(long)]
    path: String,
}

/// パスポリシーの判定結果を人間向けに整形する。
fn describe_path(raw: &str) -> String {
    match ObjectPath::parse(raw) {
        Ok(path) => format!(
            "sanitized: {path}\nallowed: yes (prefix {})",
            path.prefix()
        ),
        Err(rejected) => format!("sanitized: {}\nallowed: no", rejected.sanitized),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let http_client = reqwest::Client::new();

    match cli.command {
        Command::Sign(args) => {
            let url =
                client::request_signed_url(&http_client, &args.endpoint, &args.token, &args.path)
                    .await?;
            println!("{url}");
            eprintln!("有効期限: {SIGNED_URL_EXPIRY_SECS}秒");
        }
        Command::Fetch { service, output } => {
            let url = client::request_signed_url(
                &http_client,
                &service.endpoint,
                &service.token,
                &service.path,
            )
            .await?;
            let bytes = client::download(&http_client, &url).await?;
            tokio::fs::write(&output, &bytes).await?;
            eprintln!(
                "{} を保存しました ({} bytes)",
                output.display(),
                bytes.len()
            );
        }
        Command::CheckPath { path } => {
            if sanitize_object_path(&path) != path {
                eprintln!("注意: 入力パスはサニタイズで変更されます");
            }
            println!("{}", describe_path(&path));
        }
    }

    Ok(())
}
