//! EventSink の実装

use std::sync::Mutex;

use tracing::{error, info, warn};

use crate::domain::{DomainEvent, EventRecord, Severity};
use crate::ports::EventSink;

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, record: EventRecord) {
        let delivery_id = record.delivery_id;
        let kind = record.event.kind();
        match &record.event {
            DomainEvent::LrpDesired { guid } => {
                info!(%delivery_id, kind, guid = %guid, "desired lrp");
            }
            DomainEvent::MessageRejected { reason } => {
                error!(%delivery_id, kind, error = %reason, "failed to parse inbound message");
            }
            DomainEvent::StoreWriteFailed { guid, reason } => {
                error!(%delivery_id, kind, guid = %guid, error = %reason, "failed to desire lrp");
            }
            DomainEvent::LegacyMetadataDiscarded { guid, reason } => {
                warn!(
                    %delivery_id,
                    kind,
                    guid = %guid,
                    error = %reason,
                    "discarded malformed VCAP_APPLICATION"
                );
            }
        }
    }
}

/// Keeps every record in memory so tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    records: Mutex<Vec<EventRecord>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        // poison されていても中身は読める
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.records().into_iter().map(|r| r.event).collect()
    }

    /// Rendered messages of warn/error events.
    pub fn failure_messages(&self) -> Vec<String> {
        self.records()
            .iter()
            .filter(|r| r.event.severity() != Severity::Info)
            .map(|r| r.event.message())
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, record: EventRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _record: EventRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryId, ProcessGuid};
    use chrono::Utc;
    use std::io;
    use std::sync::Arc;
    use ulid::Ulid;

    /// fmt layer の出力先
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn output(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.output()
    }

    fn record(event: DomainEvent) -> EventRecord {
        EventRecord {
            delivery_id: DeliveryId::from_ulid(Ulid::new()),
            recorded_at: Utc::now(),
            event,
        }
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        sink.emit(record(DomainEvent::LrpDesired {
            guid: ProcessGuid::for_app("a", "v1"),
        }));
        sink.emit(record(DomainEvent::MessageRejected {
            reason: "missing field app_id".to_string(),
        }));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "lrp_desired");
        assert_eq!(
            sink.failure_messages(),
            vec!["failed to parse inbound message: missing field app_id".to_string()]
        );
    }

    #[test]
    fn tracing_sink_emits_guid_and_error_as_fields() {
        let out = capture(|| {
            TracingEventSink.emit(record(DomainEvent::StoreWriteFailed {
                guid: ProcessGuid::for_app("a", "v1"),
                reason: "connection error".to_string(),
            }));
        });
        assert!(out.contains("ERROR"), "{out}");
        assert!(out.contains("failed to desire lrp"), "{out}");
        assert!(out.contains("guid=a-v1"), "{out}");
        assert!(out.contains("error=connection error"), "{out}");

        let out = capture(|| {
            TracingEventSink.emit(record(DomainEvent::MessageRejected {
                reason: "missing field app_id".to_string(),
            }));
        });
        assert!(out.contains("failed to parse inbound message"), "{out}");
        assert!(out.contains("error=missing field app_id"), "{out}");
        assert!(!out.contains("guid="), "{out}");

        let out = capture(|| {
            TracingEventSink.emit(record(DomainEvent::LegacyMetadataDiscarded {
                guid: ProcessGuid::for_app("a", "v1"),
                reason: "expected value".to_string(),
            }));
        });
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("guid=a-v1"), "{out}");
        assert!(out.contains("error=expected value"), "{out}");
    }

    #[test]
    fn tracing_and_noop_sinks_accept_every_severity() {
        let events = [
            DomainEvent::LrpDesired {
                guid: ProcessGuid::for_app("a", "v1"),
            },
            DomainEvent::LegacyMetadataDiscarded {
                guid: ProcessGuid::for_app("a", "v1"),
                reason: "expected value".to_string(),
            },
            DomainEvent::StoreWriteFailed {
                guid: ProcessGuid::for_app("a", "v1"),
                reason: "connection error".to_string(),
            },
        ];
        for event in events {
            TracingEventSink.emit(record(event.clone()));
            NoopEventSink.emit(record(event));
        }
    }
}
