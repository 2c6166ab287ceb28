//! Gatekeeper - 認証情報の検証とレート受付
//!
//! # 順序
//! 1. API キーを検証する
//! 2. 通過したキーで RateGovernor に問い合わせる
//!
//! 不正なキーはレート枠を消費しない。

use tracing::warn;

use super::rate_governor::RateGovernor;
use crate::domain::GateError;

pub struct Gatekeeper {
    api_key: String,
    governor: RateGovernor,
}

impl Gatekeeper {
    pub fn new(api_key: impl Into<String>, governor: RateGovernor) -> Self {
        Self {
            api_key: api_key.into(),
            governor,
        }
    }

    pub async fn admit(&self, api_key: Option<&str>) -> Result<(), GateError> {
        let Some(key) = api_key.filter(|k| *k == self.api_key) else {
            warn!(present = api_key.is_some(), "rejected request with invalid API key");
            return Err(GateError::Unauthorized);
        };
        self.governor.check(key).await?;
        Ok(())
    }
}
