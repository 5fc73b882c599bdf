//! appmgr-core
//!
//! "desire app" メッセージを desired LRP に変換して store に書き込むためのコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, action, lrp, message, errors, events）
//! - **ports**: 抽象化レイヤー（MessageBus, DesiredLrpStore, EventSink, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryBus, InMemoryDesiredLrpStore, TracingEventSink など）
//! - **app**: アプリケーションロジック（environment, lrp_builder, handler, listener, builder）
//! - **config**: 起動時設定（AppConfig）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;
pub mod config;
