//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::DeliveryId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は配送ごとの ID を生成
///
/// # Thread Safety
/// - 配送は並行に処理されるので `Send + Sync` を要求
pub trait IdGenerator: Send + Sync {
    fn generate_delivery_id(&self) -> DeliveryId;
}

/// UlidGenerator は Clock の時刻 + ランダム部分から ULID を作る
///
/// FixedClock を渡すと timestamp 部分が決定的になる。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_delivery_id(&self) -> DeliveryId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        DeliveryId::from(ulid)
    }
}
