//! App - アプリケーション層
//!
//! ports を組み合わせて自動化ワークフローを構成します。
//!
//! # コンポーネント
//! - **Orchestrator**: 1 ワークフローを状態機械に沿って実行
//! - **OrchestratorBuilder**: アダプタの fail-fast な組み立て
//! - **AdapterResolver**: リクエストごとにモック / 本番アダプタを選択
//! - **RateGovernor / Gatekeeper**: 認証とスライディングウィンドウでの受付
//! - **AutomationService**: CLI が呼び出すエントリポイント

pub mod admission;
pub mod builder;
pub mod orchestrator;
pub mod rate_governor;
pub mod resolver;
pub mod service;
pub mod settings;

pub use self::admission::Gatekeeper;
pub use self::builder::{BuildError, OrchestratorBuilder};
pub use self::orchestrator::Orchestrator;
pub use self::rate_governor::RateGovernor;
pub use self::resolver::AdapterResolver;
pub use self::service::{AutomationService, ServiceError};
pub use self::settings::{RateLimitConfig, Settings};
