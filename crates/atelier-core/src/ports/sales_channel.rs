//! SalesChannel port - 生成物を 1 チャネルに出品する

use async_trait::async_trait;

use crate::domain::{Channel, GeneratedProduct, ProductInput, PublishError, PublishResult};

/// [`Channel`] ごとに 1 実装。Orchestrator はチャネルをキーに引く
#[async_trait]
pub trait SalesChannel: Send + Sync {
    /// このアダプタが担当するチャネル。すべての `PublishResult` にコピーされる
    fn channel(&self) -> Channel;

    async fn publish(
        &self,
        product: &GeneratedProduct,
        input: &ProductInput,
    ) -> Result<PublishResult, PublishError>;
}
