//! Domain model (identifiers, actions, desired LRPs, inbound messages, ...).
//!
//! ここにあるものは全て純粋なデータと変換のみで、I/O は持たない。

pub mod ids;
pub mod action;
pub mod lrp;
pub mod message;
pub mod errors;
pub mod events;

// 主要な型を再エクスポート
pub use self::ids::{DeliveryId, ProcessGuid};
pub use self::action::{DownloadAction, EnvironmentVariable, ExecutorAction, RunAction};
pub use self::lrp::{APP_LOG_SOURCE, DesiredLrp, LogConfig, LrpState};
pub use self::message::{DESIRE_APP_SUBJECT, DesireAppMessage};
pub use self::errors::{DecodeError, DesireError, StoreError};
pub use self::events::{DomainEvent, EventRecord, Severity};
