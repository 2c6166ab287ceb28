//! Domain identifiers（強い型付けされた ID）
//!
//! すべての ID は `Id<T>` でラップされた ULID です。`T` はサイズ 0 のマーカー型で、
//! 表示用のプレフィックスを提供し、`ProductId` が期待される場所に `WorkflowId` を
//! 渡すといった取り違えをコンパイル時に防ぎます。
//!
//! ## ULID を使う理由
//! - ID ごとに 80 bit のランダム部があり、並行投入でも実用上衝突しない
//! - 連番ではないため、過去に何件実行されたかが ID から漏れない
//! - 先頭がタイムスタンプなので、ログ上でおおむね時系列に並ぶ

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// ID の種類ごとのマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// `Display` / `FromStr` / serde で使うプレフィックス（例: `"wrk-"`）
    fn prefix() -> &'static str;
}

/// ULID を内包する汎用 ID
///
/// # メモリレイアウト
/// - `T` はコンパイル時にのみ存在する（`PhantomData`）
/// - そのため `Id<T>` のサイズは素の `Ulid` と同じ
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// 文字列が `<prefix><ULID>` 形式でないときのエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id {value:?}: expected {prefix}<ULID>")]
pub struct ParseIdError {
    value: String,
    prefix: &'static str,
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError {
            value: s.to_string(),
            prefix: T::prefix(),
        };
        let raw = s.strip_prefix(T::prefix()).ok_or_else(err)?;
        let ulid = Ulid::from_string(raw).map_err(|_| err())?;
        Ok(Self::from_ulid(ulid))
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ========================================
// マーカー型
// ========================================

/// ワークフロー用マーカー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Workflow {}

impl IdMarker for Workflow {
    fn prefix() -> &'static str {
        "wrk-"
    }
}

/// 生成された商品用マーカー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Product {}

impl IdMarker for Product {
    fn prefix() -> &'static str {
        "prd-"
    }
}

/// 1 回のワークフロー実行の ID（投入と状態照会の単位）
pub type WorkflowId = Id<Workflow>;

/// DesignEngine が生成物に割り当てる ID
pub type ProductId = Id<Product>;
