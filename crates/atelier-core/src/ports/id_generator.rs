//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID（Clock のタイムスタンプ + 80 bit 乱数）
//!
//! # テスト容易性
//! - ワークフロー ID を固定すれば、`run` の完了前にレコードを観測できる

use ulid::Ulid;

use crate::domain::{ProductId, WorkflowId};
use crate::ports::Clock;

/// IdGenerator は新しい ID を払い出す
///
/// # スレッド安全性
/// - `Send + Sync`: 1 つのジェネレータを並行するすべての `run` で共有する
pub trait IdGenerator: Send + Sync {
    fn generate_workflow_id(&self) -> WorkflowId;

    fn generate_product_id(&self) -> ProductId;
}

/// ULID ベースのジェネレータ
///
/// 一意性は時計ではなく乱数部が担うため、`FixedClock` でも ID は重複しない。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_workflow_id(&self) -> WorkflowId {
        WorkflowId::from(self.next())
    }

    fn generate_product_id(&self) -> ProductId {
        ProductId::from(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);
        let ids: HashSet<_> = (0..1_000).map(|_| id_gen.generate_workflow_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn ulid_generator_with_fixed_clock_still_differs() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_workflow_id();
        let id2 = id_gen.generate_workflow_id();
        assert_ne!(id1, id2);

        // Only the timestamp part is pinned.
        assert_eq!(id1.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert_eq!(id2.as_ulid().timestamp_ms(), id1.as_ulid().timestamp_ms());
    }

    #[test]
    fn id_kinds_carry_their_prefix() {
        let id_gen = UlidGenerator::new(SystemClock);
        assert!(id_gen.generate_workflow_id().to_string().starts_with("wrk-"));
        assert!(id_gen.generate_product_id().to_string().starts_with("prd-"));
    }
}
