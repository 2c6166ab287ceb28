//! AutomationService - プロセス全体のエントリポイント
//!
//! 共有の TaskStore・Gatekeeper・AdapterResolver を所有します。
//!
//! # 設計原則
//! - すべての呼び出しはまず Gatekeeper を通る
//! - 拒否・検証エラーになった投入はワークフローを作らない
//! - ストア障害は `ServiceError::Store` として返す

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use super::admission::Gatekeeper;
use super::builder::BuildError;
use super::rate_governor::RateGovernor;
use super::resolver::AdapterResolver;
use super::settings::Settings;
use crate::domain::{
    AutomationRequest, GateError, StoreError, TaskRecord, ValidationError, WorkflowId,
};
use crate::impls::InMemoryTaskStore;
use crate::ports::{Clock, SystemClock, TaskStore, UlidGenerator};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Workflow not found: {0}")]
    NotFound(WorkflowId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

pub struct AutomationService {
    gatekeeper: Gatekeeper,
    resolver: AdapterResolver,
    store: Arc<dyn TaskStore>,
}

impl AutomationService {
    /// InMemoryTaskStore と SystemClock で組み立てる
    pub fn new(settings: &Settings) -> Self {
        Self::with_parts(
            settings,
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn with_parts(settings: &Settings, store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        let governor = RateGovernor::with_clock(settings.rate_limit, clock.clone());
        let ids = Arc::new(UlidGenerator::new(clock));
        Self {
            gatekeeper: Gatekeeper::new(settings.api_key.clone(), governor),
            resolver: AdapterResolver::new(settings, ids),
            store,
        }
    }

    /// 1 ワークフローを投入する
    ///
    /// # 実装
    /// 1. Gatekeeper で受付
    /// 2. リクエストを検証
    /// 3. アダプタを解決して Orchestrator を組み立て、実行
    pub async fn submit(
        &self,
        api_key: Option<&str>,
        request: &AutomationRequest,
    ) -> Result<TaskRecord, ServiceError> {
        self.gatekeeper.admit(api_key).await?;
        if let Err(err) = request.validate() {
            info!(field = err.field(), error = %err, "request rejected");
            return Err(err.into());
        }
        let orchestrator = self
            .resolver
            .resolve(&request.integrations, self.store.clone())?;
        Ok(orchestrator.run(request).await)
    }

    /// 受付後、`workflow_id` の最新レコードを返す
    pub async fn workflow(
        &self,
        api_key: Option<&str>,
        workflow_id: WorkflowId,
    ) -> Result<TaskRecord, ServiceError> {
        self.gatekeeper.admit(api_key).await?;
        match self.store.get(workflow_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ServiceError::NotFound(workflow_id)),
            Err(err) => {
                error!(workflow_id = %workflow_id, error = %err, "task store read failed");
                Err(ServiceError::Store(err))
            }
        }
    }
}
