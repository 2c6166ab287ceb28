//! InMemoryTaskStore - プロセス生存期間のタスクレジストリ
//!
//! # 実装
//! - `HashMap<WorkflowId, TaskRecord>` を tokio の `Mutex` 1 つで保護
//! - `save` はロック内でレコードを丸ごと置き換えるため、`get` は旧レコードか
//!   新レコードのどちらかしか見ない
//! - 読み出しはクローンを返す。ロックを await をまたいで保持しない

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{StoreError, TaskRecord, WorkflowId};
use crate::ports::TaskStore;

#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    records: Arc<Mutex<HashMap<WorkflowId, TaskRecord>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに記録したワークフロー数
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, record: TaskRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(record.workflow_id(), record);
        Ok(())
    }

    async fn get(&self, workflow_id: WorkflowId) -> Result<Option<TaskRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.get(&workflow_id).cloned())
    }
}
