//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryBus**: tokio broadcast ベースの pub/sub
//! - **InMemoryDesiredLrpStore**: key/value ノードをメモリに持つ store（障害注入つき）
//! - **TracingEventSink / RecordingEventSink / NoopEventSink**: EventSink
//!
//! # 本番用実装
//! 実際の bus（NATS）や distributed store のクライアントは別クレートに置く想定。

pub mod inmem_bus;
pub mod inmem_store;
pub mod event_sinks;

// 主要な型を再エクスポート
pub use self::inmem_bus::InMemoryBus;
pub use self::inmem_store::InMemoryDesiredLrpStore;
pub use self::event_sinks::{NoopEventSink, RecordingEventSink, TracingEventSink};
