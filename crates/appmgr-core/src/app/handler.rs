//! DesireHandler - 1 メッセージ分のパイプライン
//!
//! # フロー
//! 1. DesireAppMessage::decode() で検証（失敗したら store には触らない）
//! 2. enrich_environment() で環境変数を組み立て
//! 3. build_desired_lrp() で記述子を作成
//! 4. DesiredLrpStore::desire_lrp() で upsert（1 回だけ。リトライなし）
//!
//! 結果は全て EventSink に報告する。状態を持たないので並行に呼んでよい。

use std::sync::Arc;

use crate::app::environment::{
    BIND_ALL_HOST, CONTAINER_PORT, InstanceFacts, enrich_environment,
};
use crate::app::lrp_builder::{DESIRED_INSTANCE_INDEX, build_desired_lrp};
use crate::domain::{
    DeliveryId, DesireAppMessage, DesireError, DesiredLrp, DomainEvent, EventRecord, ProcessGuid,
};
use crate::ports::{Clock, DesiredLrpStore, EventSink, IdGenerator};

pub struct DesireHandler {
    store: Arc<dyn DesiredLrpStore>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl DesireHandler {
    pub fn new(
        store: Arc<dyn DesiredLrpStore>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            events,
            clock,
            ids,
        }
    }

    /// Translate one raw payload and write the result.
    ///
    /// 失敗も EventSink に報告済みなので、listener は戻り値を捨ててよい。
    pub async fn handle(&self, payload: &[u8]) -> Result<ProcessGuid, DesireError> {
        let delivery_id = self.ids.generate_delivery_id();

        let result = self.process(delivery_id, payload).await;
        match &result {
            Ok(guid) => self.emit(delivery_id, DomainEvent::LrpDesired { guid: guid.clone() }),
            Err(DesireError::Decode(err)) => self.emit(
                delivery_id,
                DomainEvent::MessageRejected {
                    reason: err.to_string(),
                },
            ),
            Err(DesireError::Store { guid, source }) => self.emit(
                delivery_id,
                DomainEvent::StoreWriteFailed {
                    guid: guid.clone(),
                    reason: source.to_string(),
                },
            ),
        }
        result
    }

    async fn process(
        &self,
        delivery_id: DeliveryId,
        payload: &[u8],
    ) -> Result<ProcessGuid, DesireError> {
        let message = DesireAppMessage::decode(payload)?;
        let lrp = self.translate(delivery_id, &message);

        // lrp はこの呼び出しの間だけ所有し、結果に関わらずここで捨てる
        self.store
            .desire_lrp(&lrp)
            .await
            .map_err(|source| DesireError::Store {
                guid: lrp.guid.clone(),
                source,
            })?;
        Ok(lrp.guid)
    }

    fn translate(&self, delivery_id: DeliveryId, message: &DesireAppMessage) -> DesiredLrp {
        let guid = message.process_guid();
        let facts = InstanceFacts {
            guid: &guid,
            index: DESIRED_INSTANCE_INDEX,
            host: BIND_ALL_HOST,
            port: CONTAINER_PORT,
        };

        let enriched = enrich_environment(&message.environment, &facts);
        if let Some(reason) = enriched.discarded_legacy_metadata {
            self.emit(
                delivery_id,
                DomainEvent::LegacyMetadataDiscarded {
                    guid: guid.clone(),
                    reason,
                },
            );
        }

        build_desired_lrp(message, enriched.env)
    }

    fn emit(&self, delivery_id: DeliveryId, event: DomainEvent) {
        self.events.emit(EventRecord {
            delivery_id,
            recorded_at: self.clock.now(),
            event,
        });
    }
}
