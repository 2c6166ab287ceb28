//! RateGovernor - identity ごとのスライディングウィンドウ流量制御
//!
//! # 実装
//! - identity ごとに「受理したリクエストの時刻」を `VecDeque` で保持
//! - check のたびに `now - window` 以前の時刻を捨て、残りが `max_requests`
//!   未満なら受理して `now` を記録する
//! - 拒否は記録しない（拒否され続けてもロックアウトが延びない）
//! - ウィンドウ内に時刻が 1 つも残っていない identity はマップから取り除く。
//!   マップの大きさは「直近 1 ウィンドウで受理された identity 数」で抑えられる
//!
//! # テスト容易性
//! - 時刻は `Clock` port 経由で取得するため、`FixedClock` で境界を再現できる

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::settings::RateLimitConfig;
use crate::domain::AdmissionError;
use crate::ports::{Clock, SystemClock};

pub struct RateGovernor {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    /// identity → 受理時刻（古い順）。空のキューは保持しない
    hits: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl RateGovernor {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// `identity` のリクエストを 1 件受理または拒否する
    ///
    /// 受理した場合のみ時刻を記録する。
    pub async fn check(&self, identity: &str) -> Result<(), AdmissionError> {
        let now = self.clock.now();
        let cutoff = now
            .checked_sub_signed(self.config.window())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let max = self.config.max_requests as usize;

        let mut hits = self.hits.lock().await;
        // 期限切れの時刻を捨て、空になった identity ごと取り除く
        hits.retain(|_, window| {
            while let Some(oldest) = window.front()
                && *oldest <= cutoff
            {
                window.pop_front();
            }
            !window.is_empty()
        });

        let in_window = hits.get(identity).map_or(0, VecDeque::len);
        if in_window >= max {
            warn!(in_window, max, "rate limit exceeded");
            return Err(AdmissionError::TooManyRequests);
        }
        hits.entry(identity.to_string()).or_default().push_back(now);
        debug!(in_window = in_window + 1, max, "request admitted");
        Ok(())
    }

    /// 現在ウィンドウ内に受理履歴を持つ identity の数
    pub async fn tracked_identities(&self) -> usize {
        self.hits.lock().await.len()
    }
}
