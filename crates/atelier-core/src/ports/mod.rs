//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（デザイン生成サービス、ストア、SNS、タスクレジストリ）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//! テストではモック、本番では HTTP アダプタを差し込みます。

pub mod clock;
pub mod design_engine;
pub mod id_generator;
pub mod sales_channel;
pub mod social_publisher;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::design_engine::DesignEngine;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::sales_channel::SalesChannel;
pub use self::social_publisher::SocialPublisher;
pub use self::task_store::TaskStore;
