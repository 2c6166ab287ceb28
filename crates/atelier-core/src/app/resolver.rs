//! AdapterResolver - リクエストごとの Orchestrator 組み立て
//!
//! # 選択規則
//! - モックチャネルは常に利用可能
//! - WooCommerce / Printify はリクエストに完全な認証情報がある場合のみ組み込む
//! - SNS はモック。webhook URL が設定されていれば webhook 経由の publisher にする

use std::sync::Arc;

use tracing::debug;
use url::Url;

use super::builder::BuildError;
use super::orchestrator::Orchestrator;
use super::settings::Settings;
use crate::domain::{Channel, IntegrationConfig, SocialPlatform};
use crate::impls::{
    JsonHttpClient, MockDesignEngine, MockSalesChannel, MockSocialPublisher, PrintifyChannel,
    WebhookSocialPublisher, WooCommerceChannel,
};
use crate::ports::{DesignEngine, IdGenerator, SocialPublisher, TaskStore};

pub struct AdapterResolver {
    client: JsonHttpClient,
    social_webhook_url: Option<Url>,
    design_engine: Arc<dyn DesignEngine>,
    ids: Arc<dyn IdGenerator>,
}

impl AdapterResolver {
    /// 認証情報の有無にかかわらずモックで扱うチャネル
    pub const MOCK_CHANNELS: [Channel; 4] = [
        Channel::Pod,
        Channel::Website,
        Channel::Marketplace,
        Channel::SocialCommerce,
    ];

    pub fn new(settings: &Settings, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            client: JsonHttpClient::new(settings.http_timeout, settings.dry_run),
            social_webhook_url: settings.social_webhook_url.clone(),
            design_engine: Arc::new(MockDesignEngine::new(ids.clone())),
            ids,
        }
    }

    pub fn resolve(
        &self,
        integrations: &IntegrationConfig,
        store: Arc<dyn TaskStore>,
    ) -> Result<Orchestrator, BuildError> {
        let mut builder = Orchestrator::builder()
            .design_engine(self.design_engine.clone())
            .task_store(store)
            .id_generator(self.ids.clone());

        for channel in Self::MOCK_CHANNELS {
            builder = builder.channel(Arc::new(MockSalesChannel::new(channel)));
        }
        if let Some(credentials) = integrations.woocommerce() {
            debug!("woocommerce credentials present");
            builder = builder.channel(Arc::new(WooCommerceChannel::new(
                credentials,
                self.client.clone(),
            )));
        }
        if let Some(credentials) = integrations.printify() {
            debug!("printify credentials present");
            builder = builder.channel(Arc::new(PrintifyChannel::new(
                credentials,
                self.client.clone(),
            )));
        }

        for platform in SocialPlatform::ALL {
            let publisher: Arc<dyn SocialPublisher> = match &self.social_webhook_url {
                Some(url) => Arc::new(WebhookSocialPublisher::new(
                    platform,
                    url.clone(),
                    self.client.clone(),
                )),
                None => Arc::new(MockSocialPublisher::new(platform)),
            };
            builder = builder.social_publisher(publisher);
        }

        builder.build()
    }
}
