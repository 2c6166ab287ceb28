//! Domain - ドメインモデル
//!
//! ID・リクエスト・結果・状態機械・エラーを定義します。
//! このモジュールは I/O を一切行いません（外部とのやり取りは `ports` / `impls` / `app`）。

pub mod errors;
pub mod ids;
pub mod plan;
pub mod product;
pub mod record;
pub mod request;
pub mod social;
pub mod state;

pub use errors::{
    AdmissionError, BoxError, GateError, GenerationError, PostError, PublishError,
    StoreError, ValidationError, WorkflowError,
};
pub use ids::{ProductId, WorkflowId};
pub use plan::{AutomationResult, RevenuePlan};
pub use product::{Channel, GeneratedProduct, ProductInput, PublishResult};
pub use record::TaskRecord;
pub use request::{AutomationRequest, IntegrationConfig, PrintifyCredentials, WooCommerceCredentials};
pub use social::{SocialPlatform, SocialPostRequest, SocialPostResult};
pub use state::TaskState;
