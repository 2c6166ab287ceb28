//! JsonHttpClient - 本番アダプタが共有する JSON POST ヘルパー
//!
//! # 実装
//! - reqwest の `Client` を 1 つ保持し、タイムアウトは生成時に固定
//! - 2xx 以外のステータスはレスポンス本文ごとエラーにする
//! - dry-run ではプロセス外に何も送らず、プロバイダ風の合成レスポンスを返す

use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::short_hex;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    http: reqwest::Client,
    dry_run: bool,
}

impl JsonHttpClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    pub fn new(timeout: Duration, dry_run: bool) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { http, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `body` を JSON で POST し、レスポンス本文を JSON としてデコードする
    pub async fn post(
        &self,
        url: &Url,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, HttpError> {
        if self.dry_run {
            debug!(url = %url, "dry run, skipping request");
            return Ok(json!({
                "id": format!("dry_{}", short_hex()),
                "permalink": format!("{url}/dry-run"),
            }));
        }

        let mut request = self.http.post(url.clone()).json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let resp = request.send().await.map_err(|source| HttpError::Request {
            url: url.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "provider rejected request");
            return Err(HttpError::Status {
                url: url.clone(),
                status,
                body,
            });
        }

        resp.json::<Value>().await.map_err(|source| HttpError::Decode {
            url: url.clone(),
            source,
        })
    }
}

impl Default for JsonHttpClient {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT, true)
    }
}

/// プロバイダのレスポンスから文字列フィールドを取り出す
///
/// 数値の ID は 10 進表記の文字列にする。
pub(crate) fn response_field(response: &Value, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
