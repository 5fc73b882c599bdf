//! Domain identifiers.
//!
//! 2 種類の ID がある:
//! - **ProcessGuid**: desired LRP の識別子かつ store のキー。`app_id` と `app_version` から決定的に作る。
//! - **DeliveryId**: bus から受け取った 1 メッセージの識別子（ログ相関用）。ULID ベース。
//!
//! ## Phantom Type パターン
//! `Id<T>` はジェネリック型で、`T` は実行時には使わないマーカー型。
//! 今は Delivery しかないが、配送単位の ID が増えても同じ実装を使い回せる。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "delivery-"）
    fn prefix() -> &'static str;
}

/// ULID を包むジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
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

/// Delivery のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Delivery {}

impl IdMarker for Delivery {
    fn prefix() -> &'static str {
        "delivery-"
    }
}

/// Identifier of one inbound bus message.
pub type DeliveryId = Id<Delivery>;

/// Identity of a desired LRP and its store key: `app_id + "-" + app_version`.
///
/// 同じ app/version を何度 desire しても同じ guid になるので、store 側では upsert になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessGuid(String);

impl ProcessGuid {
    pub fn for_app(app_id: &str, app_version: &str) -> Self {
        Self(format!("{app_id}-{app_version}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
