//! Mock アダプタ
//!
//! 出力の形は決定的で、ランダムなのは ID だけ。
//! CLI の demo、本番連携のないチャネルへの割り当て、テストで使う。

use std::sync::Arc;

use async_trait::async_trait;

use super::short_hex;
use crate::domain::{
    Channel, GeneratedProduct, GenerationError, PostError, ProductInput, PublishError,
    PublishResult, SocialPlatform, SocialPostResult,
};
use crate::ports::{DesignEngine, IdGenerator, SalesChannel, SocialPublisher, SystemClock, UlidGenerator};

const DESIGN_CDN: &str = "https://cdn.artiisly.local/designs";
const DEFAULT_STOREFRONT: &str = "https://commerce.local";
const VARIANTS: [&str; 4] = ["S", "M", "L", "XL"];

/// 小文字化し、`[a-z0-9]` 以外の連続を 1 つの `-` にまとめる
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn short_name(name: &str) -> &str {
    &name[..name.len().min(3)]
}

pub struct MockDesignEngine {
    ids: Arc<dyn IdGenerator>,
}

impl MockDesignEngine {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }
}

impl Default for MockDesignEngine {
    fn default() -> Self {
        Self::new(Arc::new(UlidGenerator::new(SystemClock)))
    }
}

#[async_trait]
impl DesignEngine for MockDesignEngine {
    async fn generate(&self, input: &ProductInput) -> Result<GeneratedProduct, GenerationError> {
        let product_id = self.ids.generate_product_id();
        let slug = slugify(&input.title);
        let slug = if slug.is_empty() { "untitled" } else { slug.as_str() };
        Ok(GeneratedProduct {
            product_id,
            title: input.title.clone(),
            design_url: format!("{DESIGN_CDN}/{slug}-{product_id}.png"),
            variants: VARIANTS.iter().map(|v| v.to_string()).collect(),
            base_price: input.base_price,
        })
    }
}

pub struct MockSalesChannel {
    channel: Channel,
}

impl MockSalesChannel {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl SalesChannel for MockSalesChannel {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn publish(
        &self,
        _product: &GeneratedProduct,
        input: &ProductInput,
    ) -> Result<PublishResult, PublishError> {
        let listing_id = format!("{}_{}", short_name(self.channel.as_str()), short_hex());
        let base = input
            .destination_url
            .as_ref()
            .map(|url| url.as_str().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_STOREFRONT.to_string());
        Ok(PublishResult {
            channel: self.channel,
            listing_url: format!("{base}/listings/{listing_id}"),
            listing_id,
            status: "published".to_string(),
        })
    }
}

pub struct MockSocialPublisher {
    platform: SocialPlatform,
}

impl MockSocialPublisher {
    pub fn new(platform: SocialPlatform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SocialPublisher for MockSocialPublisher {
    fn platform(&self) -> SocialPlatform {
        self.platform
    }

    async fn post(&self, _caption: &str, _media_url: &str) -> Result<SocialPostResult, PostError> {
        Ok(SocialPostResult {
            platform: self.platform,
            status: "scheduled".to_string(),
            post_id: format!("{}_{}", short_name(self.platform.as_str()), short_hex()),
        })
    }
}
