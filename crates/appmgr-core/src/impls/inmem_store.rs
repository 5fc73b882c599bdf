//! InMemoryDesiredLrpStore - 開発用・テスト用の store
//!
//! 実際の distributed store と同じく「キー → JSON バイト列」のノードとして保持する。
//! `fail_with` で障害を注入でき、書き込み試行回数も数えられる。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DesiredLrp, StoreError};
use crate::ports::{DesiredLrpStore, desired_lrp_key};

#[derive(Default)]
pub struct InMemoryDesiredLrpStore {
    /// key -> serialized DesiredLrp
    nodes: Mutex<BTreeMap<String, Vec<u8>>>,
    /// Set while the store should fail every write.
    failure: Mutex<Option<StoreError>>,
    write_attempts: AtomicUsize,
}

impl InMemoryDesiredLrpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with `err` until `clear_failure`.
    pub async fn fail_with(&self, err: StoreError) {
        *self.failure.lock().await = Some(err);
    }

    pub async fn clear_failure(&self) {
        *self.failure.lock().await = None;
    }

    /// Number of `desire_lrp` calls, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Raw stored bytes for a key.
    pub async fn node(&self, key: &str) -> Option<Vec<u8>> {
        self.nodes.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.nodes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.lock().await.is_empty()
    }
}

#[async_trait]
impl DesiredLrpStore for InMemoryDesiredLrpStore {
    async fn desire_lrp(&self, lrp: &DesiredLrp) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.failure.lock().await.clone() {
            return Err(err);
        }

        let value = lrp.to_json().map_err(|e| StoreError::Encode {
            guid: lrp.guid.clone(),
            reason: e.to_string(),
        })?;

        self.nodes
            .lock()
            .await
            .insert(desired_lrp_key(&lrp.guid), value);
        Ok(())
    }

    async fn desired_lrps(&self) -> Result<Vec<DesiredLrp>, StoreError> {
        let nodes = self.nodes.lock().await;
        nodes
            .iter()
            .map(|(key, value)| {
                DesiredLrp::from_json(value).map_err(|e| StoreError::InvalidRecord {
                    key: key.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
