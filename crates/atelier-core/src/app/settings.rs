//! Settings - プロセス全体の設定
//!
//! デフォルト値を持つ素のデータ。CLI がフラグと環境変数から埋める。

use std::time::Duration;

use url::Url;

/// 認証情報ごとのスライディングウィンドウ上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 1 ウィンドウ内で受理するリクエスト数の上限
    pub max_requests: u32,
    /// ウィンドウ長（秒）
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }

    pub fn window(&self) -> chrono::Duration {
        i64::try_from(self.window_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// 本番アダプタが通信せず合成レスポンスを返すか
    pub dry_run: bool,
    /// Gatekeeper が受け付ける唯一の API キー
    pub api_key: String,
    /// 設定時は SNS 投稿をモックではなくこの webhook に送る
    pub social_webhook_url: Option<Url>,
    pub rate_limit: RateLimitConfig,
    /// 本番アダプタの全リクエストに適用するタイムアウト
    pub http_timeout: Duration,
}

impl Settings {
    pub const DEFAULT_API_KEY: &'static str = "change-me-in-prod";
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dry_run: true,
            api_key: Self::DEFAULT_API_KEY.to_string(),
            social_webhook_url: None,
            rate_limit: RateLimitConfig::default(),
            http_timeout: Duration::from_secs(20),
        }
    }
}
