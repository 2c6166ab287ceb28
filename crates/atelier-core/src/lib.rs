//! atelier-core
//!
//! 商品アイデアからデザイン生成・チャネル出品・SNS 投稿までを 1 本のワークフローとして
//! 実行し、その進行を TaskRecord として記録するエンジン。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, request, results, state, record, errors）
//! - **ports**: 抽象化レイヤー（DesignEngine, SalesChannel, SocialPublisher, TaskStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore, モックアダプタ, HTTP アダプタ）
//! - **app**: アプリケーション層（Orchestrator, AdapterResolver, RateGovernor, AutomationService）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
