//! Errors - エラー型と分類
//!
//! # 分類
//! - **協調者エラー**（`GenerationError`, `PublishError`, `PostError`）: アダプタが返す
//! - **WorkflowError**: Orchestrator のパイプラインが返す。協調者のメッセージを
//!   そのまま保持し、failed レコードの error にそのまま書き込まれる
//! - **受付エラー**（`GateError`, `AdmissionError`）: Orchestrator には到達しない。
//!   拒否されたリクエストはワークフローを作らない

use thiserror::Error;

use super::product::Channel;
use super::social::SocialPlatform;

/// 通信レベルの失敗が保持する原因
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// リクエストのフィールドが許容範囲外
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// デザイン生成に失敗した
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("design generation rejected input: {0}")]
    Rejected(String),

    #[error("design generation failed: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },
}

/// 販売チャネルが出品を拒否した、または出品に失敗した
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish to {channel} rejected: {reason}")]
    Rejected { channel: Channel, reason: String },

    #[error("publish to {channel} failed: {source}")]
    Transport {
        channel: Channel,
        #[source]
        source: BoxError,
    },
}

impl PublishError {
    pub fn transport(channel: Channel, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            channel,
            source: source.into(),
        }
    }
}

/// SNS が投稿を拒否した、または投稿に失敗した
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post to {platform} rejected: {reason}")]
    Rejected {
        platform: SocialPlatform,
        reason: String,
    },

    #[error("post to {platform} failed: {source}")]
    Transport {
        platform: SocialPlatform,
        #[source]
        source: BoxError,
    },
}

impl PostError {
    pub fn transport(platform: SocialPlatform, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            platform,
            source: source.into(),
        }
    }
}

/// ワークフローが `failed` で終わった理由
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unsupported channel requested: {0}")]
    UnsupportedChannel(Channel),

    #[error("Unsupported social platform requested: {0}")]
    UnsupportedPlatform(SocialPlatform),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Post(#[from] PostError),
}

impl WorkflowError {
    /// 設定エラー（未対応チャネル・プラットフォーム）か
    ///
    /// 設定エラーは呼び出し側の指定ミスで決定的に再現する。それ以外は協調者由来。
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WorkflowError::UnsupportedChannel(_) | WorkflowError::UnsupportedPlatform(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::UnsupportedChannel(_) | WorkflowError::UnsupportedPlatform(_) => {
                "configuration"
            }
            WorkflowError::Generation(_) => "generation",
            WorkflowError::Publish(_) => "publish",
            WorkflowError::Post(_) => "post",
        }
    }
}

/// TaskStore が操作を完了できなかった
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

/// RateGovernor がリクエストを拒否した
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Rate limit exceeded")]
    TooManyRequests,
}

/// Orchestrator の手前にある受付ゲートの拒否理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}
