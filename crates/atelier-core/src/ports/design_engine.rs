//! DesignEngine port - 商品入力からデザイン生成物を作る

use async_trait::async_trait;

use crate::domain::{GeneratedProduct, GenerationError, ProductInput};

/// # 契約
/// - 返す生成物の `product_id` は呼び出しごとに新しい
/// - `title` と `base_price` は入力から引き継ぐ
/// - エラー時に部分的な生成物は返さない
#[async_trait]
pub trait DesignEngine: Send + Sync {
    async fn generate(&self, input: &ProductInput) -> Result<GeneratedProduct, GenerationError>;
}
