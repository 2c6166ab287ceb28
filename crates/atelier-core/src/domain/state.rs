//! ワークフローの状態機械

use std::fmt;

use serde::{Deserialize, Serialize};

/// TaskRecord の状態
///
/// # 状態遷移
/// - Running -> Complete
/// - Running -> Failed
///
/// `Queued` は実行前に積んでおく呼び出し側のためのワイヤ上の語彙。
/// Orchestrator 自身は `Running` からレコードを始める。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Running,
    Complete,
    Failed,
}

impl TaskState {
    /// 終端状態か（これ以上遷移しない）
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Complete | TaskState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Queued => "queued",
            TaskState::Running => "running",
            TaskState::Complete => "complete",
            TaskState::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
