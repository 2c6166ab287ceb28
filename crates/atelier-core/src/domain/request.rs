//! 1 ワークフロー分の投入リクエスト

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::ValidationError;
use super::product::ProductInput;
use super::social::SocialPostRequest;

/// WooCommerce REST API の認証情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WooCommerceCredentials {
    pub base_url: Url,
    pub consumer_key: String,
    pub consumer_secret: String,
}

/// Printify REST API の認証情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintifyCredentials {
    pub api_token: String,
    pub shop_id: String,
}

/// リクエストに添付されるプロバイダごとの認証情報（任意）
///
/// ワイヤ上はフラットで各フィールドが個別に省略可能。
/// プロバイダは全フィールドが揃い、かつ空でない場合にのみ「設定済み」とみなす。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woocommerce_base_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woocommerce_consumer_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woocommerce_consumer_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printify_api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printify_shop_id: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl IntegrationConfig {
    pub fn woocommerce(&self) -> Option<WooCommerceCredentials> {
        Some(WooCommerceCredentials {
            base_url: self.woocommerce_base_url.clone()?,
            consumer_key: non_empty(&self.woocommerce_consumer_key)?.to_string(),
            consumer_secret: non_empty(&self.woocommerce_consumer_secret)?.to_string(),
        })
    }

    pub fn printify(&self) -> Option<PrintifyCredentials> {
        Some(PrintifyCredentials {
            api_token: non_empty(&self.printify_api_token)?.to_string(),
            shop_id: non_empty(&self.printify_shop_id)?.to_string(),
        })
    }
}

/// 1 ワークフローの開始に必要なものすべて
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRequest {
    pub product: ProductInput,

    #[serde(default)]
    pub social: SocialPostRequest,

    #[serde(default)]
    pub integrations: IntegrationConfig,
}

impl AutomationRequest {
    pub fn new(product: ProductInput) -> Self {
        Self {
            product,
            social: SocialPostRequest::default(),
            integrations: IntegrationConfig::default(),
        }
    }

    pub fn with_social(mut self, social: SocialPostRequest) -> Self {
        self.social = social;
        self
    }

    pub fn with_integrations(mut self, integrations: IntegrationConfig) -> Self {
        self.integrations = integrations;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.product.validate()?;
        self.social.validate()
    }
}
