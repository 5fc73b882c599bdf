//! Ports - 抽象化レイヤー
//!
//! 外部システム（bus, distributed store, ログ基盤）へのインターフェース。
//! 実装は `impls` か、本番用の別クレートに置く。
//!
//! # 設計原則
//! - store への書き込みは guid をキーにした upsert（同じ guid なら上書き）
//! - bus は fire-and-forget（ack も再配送もない）
//! - ログはグローバルではなく EventSink として注入する

pub mod bus;
pub mod desired_store;
pub mod event_sink;
pub mod clock;
pub mod id_generator;

// 主要な trait を再エクスポート
pub use self::bus::{BusError, MessageBus, Subscription};
pub use self::desired_store::{DESIRED_LRP_SCHEMA_ROOT, DesiredLrpStore, desired_lrp_key};
pub use self::event_sink::EventSink;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
