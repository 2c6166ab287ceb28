//! atelier - 商品自動化ワークフローの CLI
//!
//!   atelier run request.json   リクエストファイルを投入（`-` で stdin）
//!   atelier demo               組み込みリクエストをモックアダプタで実行
//!
//! TaskRecord は JSON で stdout に、ログは stderr に出力する。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use atelier_core::app::{AutomationService, RateLimitConfig, Settings};
use atelier_core::domain::{AutomationRequest, Channel, ProductInput, SocialPlatform, SocialPostRequest, TaskRecord};

#[derive(Parser)]
#[command(name = "atelier", about = "Product design, listing and promotion workflows")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Emit logs as JSON
    #[arg(long, env = "ATELIER_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SettingsArgs {
    /// Skip network calls in live adapters
    #[arg(
        long,
        env = "ATELIER_DRY_RUN",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    dry_run: bool,

    /// API key the service accepts
    #[arg(long, env = "ATELIER_API_KEY", default_value = Settings::DEFAULT_API_KEY, global = true)]
    api_key: String,

    /// Forward social posts to this webhook instead of the mock publishers
    #[arg(long, env = "ATELIER_SOCIAL_WEBHOOK_URL", global = true)]
    social_webhook_url: Option<Url>,

    /// Requests admitted per window and key
    #[arg(long, env = "ATELIER_RATE_LIMIT_MAX", default_value_t = 60, global = true)]
    rate_limit_max: u32,

    /// Rate limit window length in seconds
    #[arg(long, env = "ATELIER_RATE_LIMIT_WINDOW_SECS", default_value_t = 60, global = true)]
    rate_limit_window_secs: u64,

    /// Timeout for live adapter requests in seconds
    #[arg(long, env = "ATELIER_HTTP_TIMEOUT_SECS", default_value_t = 20, global = true)]
    http_timeout_secs: u64,
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Settings {
            dry_run: args.dry_run,
            api_key: args.api_key,
            social_webhook_url: args.social_webhook_url,
            rate_limit: RateLimitConfig::new(args.rate_limit_max, args.rate_limit_window_secs),
            http_timeout: Duration::from_secs(args.http_timeout_secs),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Submit an automation request
    Run {
        /// Path to a JSON request, or `-` for stdin
        request: PathBuf,

        /// Credential presented with the request (defaults to the configured key)
        #[arg(long, env = "ATELIER_CLIENT_KEY")]
        client_key: Option<String>,
    },
    /// Run a sample request against mock adapters
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let settings = Settings::from(cli.settings);
    let service = AutomationService::new(&settings);

    let record = match cli.command {
        Command::Run {
            request,
            client_key,
        } => {
            let request = read_request(&request).await?;
            let key = client_key.unwrap_or_else(|| settings.api_key.clone());
            service
                .submit(Some(&key), &request)
                .await
                .context("workflow submission rejected")?
        }
        Command::Demo => {
            info!("running demo workflow");
            service
                .submit(Some(&settings.api_key), &demo_request())
                .await
                .context("demo workflow rejected")?
        }
    };

    print_record(&record)
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("atelier=info"))
        .context("invalid log filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn read_request(path: &PathBuf) -> Result<AutomationRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_request(&raw)
}

fn parse_request(raw: &str) -> Result<AutomationRequest> {
    serde_json::from_str(raw).context("request is not a valid automation request")
}

fn demo_request() -> AutomationRequest {
    AutomationRequest::new(ProductInput::new(
        "Geometric Fox Tee",
        "animals",
        "Minimal geometric fox artwork with warm autumn tones.",
        vec![Channel::Pod, Channel::Website, Channel::Marketplace],
        24.0,
    ))
    .with_social(
        SocialPostRequest::new(vec![SocialPlatform::Instagram, SocialPlatform::Pinterest])
            .with_hashtags(["#fox", "#geometric"]),
    )
}

fn print_record(record: &TaskRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("failed to encode task record")?;
    println!("{json}");
    Ok(())
}
