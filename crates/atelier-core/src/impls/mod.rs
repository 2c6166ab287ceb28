//! Impls - port の実装
//!
//! - **InMemoryTaskStore**: プロセス生存期間のタスクレジストリ
//! - **Mock\***: 全チャネル・全プラットフォーム向けのオフラインアダプタ
//! - **WooCommerceChannel / PrintifyChannel / WebhookSocialPublisher**:
//!   `JsonHttpClient` 上の本番アダプタ（dry-run で実行可能）

pub mod http_client;
pub mod inmem_task_store;
pub mod mock;
pub mod printify;
pub mod social_webhook;
pub mod woocommerce;

pub use self::http_client::{HttpError, JsonHttpClient};
pub use self::inmem_task_store::InMemoryTaskStore;
pub use self::mock::{MockDesignEngine, MockSalesChannel, MockSocialPublisher};
pub use self::printify::PrintifyChannel;
pub use self::social_webhook::WebhookSocialPublisher;
pub use self::woocommerce::WooCommerceChannel;

/// 小文字 16 進 8 桁（合成したプロバイダ ID 用）
pub(crate) fn short_hex() -> String {
    format!("{:08x}", rand::random::<u32>())
}
