//! Orchestrator - 1 つの自動化ワークフローを最初から最後まで実行する
//!
//! # ワークフローのライフサイクル
//! ```text
//! (new id) -> running -> complete(result)
//!                     \-> failed(error)
//! ```
//!
//! # 実装
//! - `running` の書き込みはちょうど 1 回、続いて終端状態の書き込みがちょうど 1 回
//! - ステップは逐次実行: 生成 → 出品（指定順）→ 投稿（指定順）→ プラン
//! - 最初に失敗したステップでワークフローは終わる。それまでの出品・投稿は
//!   取り消さず、failed レコードにも載せない
//!
//! # エラー
//! - `run` はエラーを返さない。ストア障害も含め、すべての結果を
//!   返り値の `TaskRecord` に畳み込む

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span, warn};

use super::builder::OrchestratorBuilder;
use crate::domain::{
    AutomationRequest, AutomationResult, Channel, RevenuePlan, SocialPlatform, TaskRecord,
    WorkflowError, WorkflowId,
};
use crate::ports::{DesignEngine, IdGenerator, SalesChannel, SocialPublisher, TaskStore};

#[derive(Clone)]
pub struct Orchestrator {
    design_engine: Arc<dyn DesignEngine>,
    channels: HashMap<Channel, Arc<dyn SalesChannel>>,
    publishers: HashMap<SocialPlatform, Arc<dyn SocialPublisher>>,
    store: Arc<dyn TaskStore>,
    ids: Arc<dyn IdGenerator>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub(crate) fn from_parts(
        design_engine: Arc<dyn DesignEngine>,
        channels: HashMap<Channel, Arc<dyn SalesChannel>>,
        publishers: HashMap<SocialPlatform, Arc<dyn SocialPublisher>>,
        store: Arc<dyn TaskStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            design_engine,
            channels,
            publishers,
            store,
            ids,
        }
    }

    pub fn supports_channel(&self, channel: Channel) -> bool {
        self.channels.contains_key(&channel)
    }

    pub fn supports_platform(&self, platform: SocialPlatform) -> bool {
        self.publishers.contains_key(&platform)
    }

    /// ワークフローを終端状態まで実行し、終端レコードを返す
    ///
    /// # 前提
    /// - リクエストは検証済みであること（`AutomationService::submit` が検証する）
    pub async fn run(&self, request: &AutomationRequest) -> TaskRecord {
        let workflow_id = self.ids.generate_workflow_id();
        let span = info_span!("workflow", workflow_id = %workflow_id);

        async move {
            self.persist(TaskRecord::running(workflow_id)).await;
            info!(
                channels = request.product.target_channels.len(),
                platforms = request.social.platforms.len(),
                "workflow started"
            );

            let record = match self.execute(workflow_id, request).await {
                Ok(result) => {
                    info!(
                        publications = result.channel_publications.len(),
                        posts = result.social_posts.len(),
                        "workflow complete"
                    );
                    TaskRecord::complete(result)
                }
                Err(err) => {
                    if err.is_configuration() {
                        warn!(kind = err.kind(), error = %err, "workflow failed");
                    } else {
                        error!(kind = err.kind(), error = %err, "workflow failed");
                    }
                    TaskRecord::failed(workflow_id, err.to_string())
                }
            };

            self.persist(record.clone()).await;
            record
        }
        .instrument(span)
        .await
    }

    /// `workflow_id` の最新レコードを読む。ストア障害はエラーログを出して「なし」として扱う
    pub async fn get(&self, workflow_id: WorkflowId) -> Option<TaskRecord> {
        match self.store.get(workflow_id).await {
            Ok(record) => record,
            Err(err) => {
                error!(workflow_id = %workflow_id, error = %err, "task store read failed");
                None
            }
        }
    }

    async fn execute(
        &self,
        workflow_id: WorkflowId,
        request: &AutomationRequest,
    ) -> Result<AutomationResult, WorkflowError> {
        let input = &request.product;

        let generated_product = self.design_engine.generate(input).await?;
        debug!(product_id = %generated_product.product_id, "design generated");

        let mut channel_publications = Vec::with_capacity(input.target_channels.len());
        for &channel in &input.target_channels {
            let adapter = self
                .channels
                .get(&channel)
                .ok_or(WorkflowError::UnsupportedChannel(channel))?;
            let publication = adapter.publish(&generated_product, input).await?;
            debug!(channel = %channel, listing_id = %publication.listing_id, "published");
            channel_publications.push(publication);
        }

        let primary_listing_url = channel_publications
            .first()
            .map(|p| p.listing_url.as_str())
            .unwrap_or(generated_product.design_url.as_str());
        let caption = request
            .social
            .render_caption(&generated_product.title, primary_listing_url);

        let mut social_posts = Vec::with_capacity(request.social.platforms.len());
        for &platform in &request.social.platforms {
            let publisher = self
                .publishers
                .get(&platform)
                .ok_or(WorkflowError::UnsupportedPlatform(platform))?;
            let post = publisher
                .post(&caption, &generated_product.design_url)
                .await?;
            debug!(platform = %platform, post_id = %post.post_id, "posted");
            social_posts.push(post);
        }

        let revenue_plan = RevenuePlan::seeded(&input.niche, &input.title);

        Ok(AutomationResult {
            workflow_id,
            generated_product,
            channel_publications,
            social_posts,
            revenue_plan,
        })
    }

    async fn persist(&self, record: TaskRecord) {
        let state = record.state();
        if let Err(err) = self.store.save(record).await {
            error!(state = %state, error = %err, "task store write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{Notify, oneshot};

    use crate::domain::{
        GeneratedProduct, GenerationError, PostError, ProductId, ProductInput, PublishError,
        PublishResult, SocialPostRequest, SocialPostResult, StoreError, TaskState,
    };
    use crate::impls::{InMemoryTaskStore, MockDesignEngine, MockSalesChannel, MockSocialPublisher};
    use crate::ports::{SystemClock, UlidGenerator};

    fn request(channels: Vec<Channel>, platforms: Vec<SocialPlatform>) -> AutomationRequest {
        AutomationRequest::new(ProductInput::new(
            "Geometric Fox Tee",
            "animals",
            "Minimal geometric fox artwork with warm tones.",
            channels,
            21.0,
        ))
        .with_social(SocialPostRequest::new(platforms))
    }

    fn mock_builder(store: Arc<dyn TaskStore>) -> OrchestratorBuilder {
        let mut builder = Orchestrator::builder()
            .design_engine(Arc::new(MockDesignEngine::default()))
            .task_store(store);
        for channel in [Channel::Pod, Channel::Website, Channel::Marketplace] {
            builder = builder.channel(Arc::new(MockSalesChannel::new(channel)));
        }
        for platform in [SocialPlatform::Instagram, SocialPlatform::Pinterest] {
            builder = builder.social_publisher(Arc::new(MockSocialPublisher::new(platform)));
        }
        builder
    }

    /// Always hands out the same workflow id.
    struct PinnedIds(WorkflowId);

    impl IdGenerator for PinnedIds {
        fn generate_workflow_id(&self) -> WorkflowId {
            self.0
        }

        fn generate_product_id(&self) -> ProductId {
            UlidGenerator::new(SystemClock).generate_product_id()
        }
    }

    /// Counts publishes, fails when told to.
    struct CountingChannel {
        channel: Channel,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl SalesChannel for CountingChannel {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn publish(
            &self,
            product: &GeneratedProduct,
            input: &ProductInput,
        ) -> Result<PublishResult, PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PublishError::Rejected {
                    channel: self.channel,
                    reason: "listing quota reached".into(),
                });
            }
            MockSalesChannel::new(self.channel).publish(product, input).await
        }
    }

    struct RejectingDesignEngine;

    #[async_trait]
    impl DesignEngine for RejectingDesignEngine {
        async fn generate(&self, _input: &ProductInput) -> Result<GeneratedProduct, GenerationError> {
            Err(GenerationError::Rejected("prompt flagged".into()))
        }
    }

    /// Remembers the caption and media it was asked to post.
    struct RecordingPublisher {
        seen: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl SocialPublisher for RecordingPublisher {
        fn platform(&self) -> SocialPlatform {
            SocialPlatform::X
        }

        async fn post(&self, caption: &str, media_url: &str) -> Result<SocialPostResult, PostError> {
            self.seen
                .lock()
                .unwrap()
                .push((caption.to_string(), media_url.to_string()));
            Ok(SocialPostResult {
                platform: SocialPlatform::X,
                status: "scheduled".into(),
                post_id: "x_1".into(),
            })
        }
    }

    /// Blocks inside `publish` until released.
    struct GatedChannel {
        entered: std::sync::Mutex<Option<oneshot::Sender<()>>>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl SalesChannel for GatedChannel {
        fn channel(&self) -> Channel {
            Channel::Pod
        }

        async fn publish(
            &self,
            product: &GeneratedProduct,
            input: &ProductInput,
        ) -> Result<PublishResult, PublishError> {
            if let Some(tx) = self.entered.lock().unwrap().take() {
                let _ = tx.send(());
            }
            self.release.notified().await;
            MockSalesChannel::new(Channel::Pod).publish(product, input).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TaskStore for BrokenStore {
        async fn save(&self, _record: TaskRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }

        async fn get(&self, _workflow_id: WorkflowId) -> Result<Option<TaskRecord>, StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    #[tokio::test]
    async fn completes_with_every_channel_and_platform() {
        let store = Arc::new(InMemoryTaskStore::new());
        let orchestrator = mock_builder(store.clone()).build().unwrap();

        let record = orchestrator
            .run(&request(
                vec![Channel::Pod, Channel::Website],
                vec![SocialPlatform::Instagram],
            ))
            .await;

        assert_eq!(record.state(), TaskState::Complete);
        assert!(record.error().is_none());
        let result = record.result().unwrap();
        assert_eq!(result.workflow_id, record.workflow_id());
        assert_eq!(result.channel_publications.len(), 2);
        assert_eq!(result.social_posts.len(), 1);
        assert_eq!(result.social_posts[0].platform, SocialPlatform::Instagram);
        assert_eq!(
            result.revenue_plan.ad_campaign_seed_keywords,
            ["animals", "Geometric Fox Tee"]
        );

        let stored = orchestrator.get(record.workflow_id()).await.unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn publications_follow_request_order() {
        let orchestrator = mock_builder(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();
        let order = vec![Channel::Marketplace, Channel::Pod, Channel::Website];

        let record = orchestrator
            .run(&request(
                order.clone(),
                vec![SocialPlatform::Pinterest, SocialPlatform::Instagram],
            ))
            .await;

        let result = record.result().unwrap();
        let published: Vec<_> = result.channel_publications.iter().map(|p| p.channel).collect();
        assert_eq!(published, order);
        let posted: Vec<_> = result.social_posts.iter().map(|p| p.platform).collect();
        assert_eq!(posted, [SocialPlatform::Pinterest, SocialPlatform::Instagram]);
    }

    #[tokio::test]
    async fn unsupported_channel_fails_after_earlier_publishes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::builder()
            .design_engine(Arc::new(MockDesignEngine::default()))
            .channel(Arc::new(CountingChannel {
                channel: Channel::Pod,
                calls: calls.clone(),
                fail: false,
            }))
            .task_store(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();

        let record = orchestrator
            .run(&request(vec![Channel::Pod, Channel::Printify], vec![]))
            .await;

        assert_eq!(record.state(), TaskState::Failed);
        assert!(record.result().is_none());
        assert_eq!(record.error(), Some("Unsupported channel requested: printify"));
        // The pod listing was made and is not rolled back.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stored = orchestrator.get(record.workflow_id()).await.unwrap();
        assert_eq!(stored.state(), TaskState::Failed);
    }

    #[tokio::test]
    async fn unsupported_platform_fails_the_workflow() {
        let orchestrator = mock_builder(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();

        let record = orchestrator
            .run(&request(vec![Channel::Pod], vec![SocialPlatform::Tiktok]))
            .await;

        assert_eq!(record.state(), TaskState::Failed);
        assert_eq!(
            record.error(),
            Some("Unsupported social platform requested: tiktok")
        );
    }

    #[tokio::test]
    async fn design_failure_stops_before_publishing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::builder()
            .design_engine(Arc::new(RejectingDesignEngine))
            .channel(Arc::new(CountingChannel {
                channel: Channel::Pod,
                calls: calls.clone(),
                fail: false,
            }))
            .task_store(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();

        let record = orchestrator.run(&request(vec![Channel::Pod], vec![])).await;

        assert_eq!(record.state(), TaskState::Failed);
        assert_eq!(
            record.error(),
            Some("design generation rejected input: prompt flagged")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn publish_failure_keeps_collaborator_message() {
        let pod_calls = Arc::new(AtomicUsize::new(0));
        let web_calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::builder()
            .design_engine(Arc::new(MockDesignEngine::default()))
            .channel(Arc::new(CountingChannel {
                channel: Channel::Pod,
                calls: pod_calls.clone(),
                fail: true,
            }))
            .channel(Arc::new(CountingChannel {
                channel: Channel::Website,
                calls: web_calls.clone(),
                fail: false,
            }))
            .task_store(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();

        let record = orchestrator
            .run(&request(vec![Channel::Pod, Channel::Website], vec![]))
            .await;

        assert_eq!(
            record.error(),
            Some("publish to pod rejected: listing quota reached")
        );
        assert_eq!(pod_calls.load(Ordering::SeqCst), 1);
        assert_eq!(web_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn caption_links_first_listing_and_media_is_the_design() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let orchestrator = mock_builder(Arc::new(InMemoryTaskStore::new()))
            .social_publisher(Arc::new(RecordingPublisher { seen: seen.clone() }))
            .build()
            .unwrap();

        let mut req = request(vec![Channel::Website, Channel::Pod], vec![SocialPlatform::X]);
        req.social = req.social.with_hashtags(["#fox"]);
        let record = orchestrator.run(&req).await;

        let result = record.result().unwrap();
        let first_url = &result.channel_publications[0].listing_url;
        let (caption, media) = seen.lock().unwrap()[0].clone();
        assert_eq!(
            caption,
            format!("Geometric Fox Tee now live. Shop now: {first_url} #fox")
        );
        assert_eq!(media, result.generated_product.design_url);
    }

    #[tokio::test]
    async fn caption_falls_back_to_design_url_without_listings() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let orchestrator = mock_builder(Arc::new(InMemoryTaskStore::new()))
            .social_publisher(Arc::new(RecordingPublisher { seen: seen.clone() }))
            .build()
            .unwrap();

        let record = orchestrator
            .run(&request(vec![], vec![SocialPlatform::X]))
            .await;

        let design_url = &record.result().unwrap().generated_product.design_url;
        let (caption, _) = seen.lock().unwrap()[0].clone();
        assert!(caption.ends_with(design_url.as_str()));
    }

    #[tokio::test]
    async fn record_is_running_while_adapters_work() {
        let workflow_id = UlidGenerator::new(SystemClock).generate_workflow_id();
        let (entered_tx, entered_rx) = oneshot::channel();
        let release = Arc::new(Notify::new());
        let orchestrator = Arc::new(
            Orchestrator::builder()
                .design_engine(Arc::new(MockDesignEngine::default()))
                .channel(Arc::new(GatedChannel {
                    entered: std::sync::Mutex::new(Some(entered_tx)),
                    release: release.clone(),
                }))
                .task_store(Arc::new(InMemoryTaskStore::new()))
                .id_generator(Arc::new(PinnedIds(workflow_id)))
                .build()
                .unwrap(),
        );

        let runner = orchestrator.clone();
        let handle =
            tokio::spawn(async move { runner.run(&request(vec![Channel::Pod], vec![])).await });

        entered_rx.await.unwrap();
        let mid_run = orchestrator.get(workflow_id).await.unwrap();
        assert_eq!(mid_run.state(), TaskState::Running);
        assert!(mid_run.result().is_none() && mid_run.error().is_none());

        release.notify_one();
        let record = handle.await.unwrap();
        assert_eq!(record.state(), TaskState::Complete);
        assert_eq!(
            orchestrator.get(workflow_id).await.unwrap().state(),
            TaskState::Complete
        );
    }

    #[tokio::test]
    async fn store_failures_do_not_escape() {
        let orchestrator = mock_builder(Arc::new(BrokenStore)).build().unwrap();

        let record = orchestrator.run(&request(vec![Channel::Pod], vec![])).await;
        assert_eq!(record.state(), TaskState::Complete);
        assert!(orchestrator.get(record.workflow_id()).await.is_none());
    }

    #[tokio::test]
    async fn unknown_workflow_is_absent() {
        let orchestrator = mock_builder(Arc::new(InMemoryTaskStore::new()))
            .build()
            .unwrap();
        let id = UlidGenerator::new(SystemClock).generate_workflow_id();
        assert!(orchestrator.get(id).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_runs_get_distinct_ids() {
        let store = Arc::new(InMemoryTaskStore::new());
        let orchestrator = Arc::new(mock_builder(store.clone()).build().unwrap());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    orchestrator
                        .run(&request(vec![Channel::Pod], vec![SocialPlatform::Instagram]))
                        .await
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap();
            assert_eq!(record.state(), TaskState::Complete);
            ids.insert(record.workflow_id());
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 32);
    }
}
