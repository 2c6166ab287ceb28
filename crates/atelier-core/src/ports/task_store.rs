//! TaskStore port - workflow id → TaskRecord のレジストリ
//!
//! # 契約
//! - `save` は `workflow_id` をキーにした upsert で、レコードを丸ごと置き換える
//! - `save` は `get` に対してアトミック（読み手が書きかけのレコードを見ることはない）
//! - 異なる ID 間の保存順序は保証しない。同じ ID への書き手は Orchestrator だけで、
//!   逐次に書き込む
//!
//! # 実装
//! - **InMemoryTaskStore**: プロセス生存期間のみ（永続化しない）

use async_trait::async_trait;

use crate::domain::{StoreError, TaskRecord, WorkflowId};

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn save(&self, record: TaskRecord) -> Result<(), StoreError>;

    async fn get(&self, workflow_id: WorkflowId) -> Result<Option<TaskRecord>, StoreError>;
}
