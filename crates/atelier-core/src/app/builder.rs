//! OrchestratorBuilder - アダプタを `Orchestrator` に組み立てる
//!
//! # Fail-fast
//! - DesignEngine と TaskStore は必須。欠けていれば `build()` はエラーを返す
//! - チャネルと SocialPublisher は任意。欠けたアダプタは組み立てエラーではなく、
//!   リクエスト単位の設定エラーとして扱う

use std::collections::HashMap;
use std::sync::Arc;

use super::orchestrator::Orchestrator;
use crate::domain::{Channel, SocialPlatform};
use crate::ports::{
    DesignEngine, IdGenerator, SalesChannel, SocialPublisher, SystemClock, TaskStore,
    UlidGenerator,
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No design engine configured. Call design_engine() before build().")]
    MissingDesignEngine,

    #[error("No task store configured. Call task_store() before build().")]
    MissingTaskStore,
}

/// # 使用例
/// ```ignore
/// let orchestrator = Orchestrator::builder()
///     .design_engine(Arc::new(MockDesignEngine::default()))
///     .channel(Arc::new(MockSalesChannel::new(Channel::Pod)))
///     .social_publisher(Arc::new(MockSocialPublisher::new(SocialPlatform::X)))
///     .task_store(store)
///     .build()?;
/// ```
#[derive(Default)]
pub struct OrchestratorBuilder {
    design_engine: Option<Arc<dyn DesignEngine>>,
    channels: HashMap<Channel, Arc<dyn SalesChannel>>,
    publishers: HashMap<SocialPlatform, Arc<dyn SocialPublisher>>,
    store: Option<Arc<dyn TaskStore>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn design_engine(mut self, engine: Arc<dyn DesignEngine>) -> Self {
        self.design_engine = Some(engine);
        self
    }

    /// アダプタが報告するチャネルをキーに登録する
    ///
    /// 同じチャネルに後から登録したアダプタが先のものを置き換える。
    pub fn channel(mut self, adapter: Arc<dyn SalesChannel>) -> Self {
        self.channels.insert(adapter.channel(), adapter);
        self
    }

    pub fn social_publisher(mut self, publisher: Arc<dyn SocialPublisher>) -> Self {
        self.publishers.insert(publisher.platform(), publisher);
        self
    }

    pub fn task_store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 省略時は SystemClock 上の UlidGenerator
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<Orchestrator, BuildError> {
        let design_engine = self.design_engine.ok_or(BuildError::MissingDesignEngine)?;
        let store = self.store.ok_or(BuildError::MissingTaskStore)?;
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        Ok(Orchestrator::from_parts(
            design_engine,
            self.channels,
            self.publishers,
            store,
            ids,
        ))
    }
}
