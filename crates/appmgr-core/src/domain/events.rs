//! DomainEvent - パイプラインの結果を EventSink に報告するためのイベント
//!
//! グローバルな logger は使わない。handler が EventSink を受け取り、そこに emit する。

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{DeliveryId, ProcessGuid};

/// How loudly an event should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// The LRP was written to the store.
    LrpDesired { guid: ProcessGuid },

    /// The payload could not be decoded; nothing was written.
    MessageRejected { reason: String },

    /// The store upsert failed; the message is dropped.
    StoreWriteFailed { guid: ProcessGuid, reason: String },

    /// The caller's legacy metadata was not a JSON object and was replaced.
    LegacyMetadataDiscarded { guid: ProcessGuid, reason: String },
}

impl DomainEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::LrpDesired { .. } => "lrp_desired",
            DomainEvent::MessageRejected { .. } => "message_rejected",
            DomainEvent::StoreWriteFailed { .. } => "store_write_failed",
            DomainEvent::LegacyMetadataDiscarded { .. } => "legacy_metadata_discarded",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DomainEvent::LrpDesired { .. } => Severity::Info,
            DomainEvent::LegacyMetadataDiscarded { .. } => Severity::Warn,
            DomainEvent::MessageRejected { .. } | DomainEvent::StoreWriteFailed { .. } => {
                Severity::Error
            }
        }
    }

    /// Human-readable diagnostic including the underlying reason.
    pub fn message(&self) -> String {
        match self {
            DomainEvent::LrpDesired { guid } => format!("desired lrp {guid}"),
            DomainEvent::MessageRejected { reason } => {
                format!("failed to parse inbound message: {reason}")
            }
            DomainEvent::StoreWriteFailed { guid, reason } => {
                format!("failed to desire lrp {guid}: {reason}")
            }
            DomainEvent::LegacyMetadataDiscarded { guid, reason } => {
                format!("discarded malformed VCAP_APPLICATION for {guid}: {reason}")
            }
        }
    }
}

/// An event stamped with the delivery it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub delivery_id: DeliveryId,
    pub recorded_at: DateTime<Utc>,
    pub event: DomainEvent,
}
