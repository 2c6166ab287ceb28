//! SocialPublisher port - 1 つの SNS にキャプションを投稿する

use async_trait::async_trait;

use crate::domain::{PostError, SocialPlatform, SocialPostResult};

#[async_trait]
pub trait SocialPublisher: Send + Sync {
    fn platform(&self) -> SocialPlatform;

    /// `media_url` は生成物のデザイン URL
    async fn post(&self, caption: &str, media_url: &str) -> Result<SocialPostResult, PostError>;
}
