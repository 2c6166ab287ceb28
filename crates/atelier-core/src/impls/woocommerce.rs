//! WooCommerce 販売チャネル（REST API v3, Basic 認証）

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tracing::info;
use url::Url;

use super::http_client::{JsonHttpClient, response_field};
use super::short_hex;
use crate::domain::{
    Channel, GeneratedProduct, ProductInput, PublishError, PublishResult, WooCommerceCredentials,
};
use crate::ports::SalesChannel;

pub struct WooCommerceChannel {
    base_url: String,
    authorization: String,
    client: JsonHttpClient,
}

impl WooCommerceChannel {
    pub fn new(credentials: WooCommerceCredentials, client: JsonHttpClient) -> Self {
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.consumer_key, credentials.consumer_secret
        ));
        Self {
            base_url: credentials.base_url.as_str().trim_end_matches('/').to_string(),
            authorization: format!("Basic {token}"),
            client,
        }
    }

    fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}/wp-json/wc/v3/products", self.base_url))
    }
}

#[async_trait]
impl SalesChannel for WooCommerceChannel {
    fn channel(&self) -> Channel {
        Channel::Woocommerce
    }

    async fn publish(
        &self,
        product: &GeneratedProduct,
        input: &ProductInput,
    ) -> Result<PublishResult, PublishError> {
        let endpoint = self
            .endpoint()
            .map_err(|e| PublishError::transport(Channel::Woocommerce, e))?;
        let body = json!({
            "name": product.title,
            "type": "simple",
            "regular_price": format!("{:.2}", product.base_price),
            "description": input.style_prompt,
            "images": [{"src": product.design_url}],
        });

        let response = self
            .client
            .post(
                &endpoint,
                &[("Authorization", self.authorization.clone())],
                &body,
            )
            .await
            .map_err(|e| PublishError::transport(Channel::Woocommerce, e))?;

        let listing_id =
            response_field(&response, "id").unwrap_or_else(|| format!("woo_{}", short_hex()));
        let listing_url = response_field(&response, "permalink")
            .unwrap_or_else(|| format!("{}/product/{listing_id}", self.base_url));
        info!(channel = "woocommerce", listing_id = %listing_id, "listing created");

        Ok(PublishResult {
            channel: Channel::Woocommerce,
            listing_id,
            status: "published".to_string(),
            listing_url,
        })
    }
}
