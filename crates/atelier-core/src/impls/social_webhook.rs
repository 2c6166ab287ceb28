//! 投稿を webhook（予約投稿サービスなど）へ転送する SocialPublisher

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use url::Url;

use super::http_client::{JsonHttpClient, response_field};
use super::short_hex;
use crate::domain::{PostError, SocialPlatform, SocialPostResult};
use crate::ports::SocialPublisher;

pub struct WebhookSocialPublisher {
    platform: SocialPlatform,
    webhook_url: Url,
    client: JsonHttpClient,
}

impl WebhookSocialPublisher {
    pub fn new(platform: SocialPlatform, webhook_url: Url, client: JsonHttpClient) -> Self {
        Self {
            platform,
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl SocialPublisher for WebhookSocialPublisher {
    fn platform(&self) -> SocialPlatform {
        self.platform
    }

    async fn post(&self, caption: &str, media_url: &str) -> Result<SocialPostResult, PostError> {
        let body = json!({
            "platform": self.platform.as_str(),
            "caption": caption,
            "media_url": media_url,
        });
        let response = self
            .client
            .post(&self.webhook_url, &[], &body)
            .await
            .map_err(|e| PostError::transport(self.platform, e))?;

        let post_id =
            response_field(&response, "id").unwrap_or_else(|| format!("soc_{}", short_hex()));
        info!(platform = %self.platform, post_id = %post_id, "post scheduled");

        Ok(SocialPostResult {
            platform: self.platform,
            status: "scheduled".to_string(),
            post_id,
        })
    }
}
