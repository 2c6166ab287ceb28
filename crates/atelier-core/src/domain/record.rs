//! TaskRecord - 1 ワークフローの保存ビュー

use serde::{Deserialize, Serialize};

use super::ids::WorkflowId;
use super::plan::AutomationResult;
use super::state::TaskState;

/// ワークフローの唯一の保存ビュー
///
/// # 設計
/// - レコードは値。遷移のたびに新しいレコードを作り、ストアが同じ ID で置き換える
/// - state / result / error の組み合わせは正当なものしか作れない
///   - `Complete` は result のみを持つ
///   - `Failed` は error のみを持つ
///   - それ以外はどちらも持たない
/// - 生成経路はコンストラクタだけ。デシリアライズも規則違反のドキュメントを拒否する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTaskRecord")]
pub struct TaskRecord {
    workflow_id: WorkflowId,
    state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<AutomationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TaskRecord {
    pub fn queued(workflow_id: WorkflowId) -> Self {
        Self::bare(workflow_id, TaskState::Queued)
    }

    pub fn running(workflow_id: WorkflowId) -> Self {
        Self::bare(workflow_id, TaskState::Running)
    }

    pub fn complete(result: AutomationResult) -> Self {
        Self {
            workflow_id: result.workflow_id,
            state: TaskState::Complete,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(workflow_id: WorkflowId, error: impl Into<String>) -> Self {
        Self {
            workflow_id,
            state: TaskState::Failed,
            result: None,
            error: Some(error.into()),
        }
    }

    fn bare(workflow_id: WorkflowId, state: TaskState) -> Self {
        Self {
            workflow_id,
            state,
            result: None,
            error: None,
        }
    }

    pub fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn result(&self) -> Option<&AutomationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// 未検証のワイヤ形式。`TaskRecord` へ検証付きで変換する
#[derive(Deserialize)]
struct RawTaskRecord {
    workflow_id: WorkflowId,
    state: TaskState,
    #[serde(default)]
    result: Option<AutomationResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("task record {workflow_id} in state {state} has an invalid result/error combination")]
pub struct InvalidTaskRecord {
    workflow_id: WorkflowId,
    state: TaskState,
}

impl TryFrom<RawTaskRecord> for TaskRecord {
    type Error = InvalidTaskRecord;

    fn try_from(raw: RawTaskRecord) -> Result<Self, Self::Error> {
        let consistent = match raw.state {
            TaskState::Complete => {
                raw.result.as_ref().is_some_and(|r| r.workflow_id == raw.workflow_id)
                    && raw.error.is_none()
            }
            TaskState::Failed => raw.result.is_none() && raw.error.is_some(),
            TaskState::Queued | TaskState::Running => raw.result.is_none() && raw.error.is_none(),
        };
        if !consistent {
            return Err(InvalidTaskRecord {
                workflow_id: raw.workflow_id,
                state: raw.state,
            });
        }
        Ok(Self {
            workflow_id: raw.workflow_id,
            state: raw.state,
            result: raw.result,
            error: raw.error,
        })
    }
}
