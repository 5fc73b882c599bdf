//! InMemoryBus - 開発用の pub/sub
//!
//! subject ごとに `tokio::broadcast` チャネルを持つ。
//! バッファが溢れると古いメッセージから落ちる（fire-and-forget なので再配送はしない）。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::ports::{BusError, MessageBus, Subscription};

/// Default per-subject buffer size.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Largest per-subject buffer the bus will allocate.
pub const MAX_BUS_CAPACITY: usize = 65_536;

type Channels = HashMap<String, broadcast::Sender<Vec<u8>>>;

pub struct InMemoryBus {
    subjects: Mutex<Channels>,
    capacity: usize,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// `capacity` は `1..=MAX_BUS_CAPACITY` に丸める（broadcast は 0 を受け付けない）
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subjects: Mutex::new(HashMap::new()),
            capacity: capacity.clamp(1, MAX_BUS_CAPACITY),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// チャネルを持っている subject の数
    pub fn subject_count(&self) -> usize {
        match self.subjects.lock() {
            Ok(subjects) => subjects.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn lock(&self, subject: &str) -> Result<MutexGuard<'_, Channels>, BusError> {
        if subject.is_empty() {
            return Err(BusError::EmptySubject);
        }
        self.subjects
            .lock()
            .map_err(|_| BusError::OperationFailed("bus lock poisoned".to_string()))
    }

    /// 既存のチャネルだけを返す。publish は購読者のいない subject にチャネルを作らない。
    fn existing_sender(
        &self,
        subject: &str,
    ) -> Result<Option<broadcast::Sender<Vec<u8>>>, BusError> {
        Ok(self.lock(subject)?.get(subject).cloned())
    }

    /// subject のチャネルを取得（なければ作成）。ロックはこの中で完結する。
    fn sender(&self, subject: &str) -> Result<broadcast::Sender<Vec<u8>>, BusError> {
        let mut subjects = self.lock(subject)?;
        let sender = subjects
            .entry(subject.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.clone())
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        // 購読者がいなければ捨てる（fire-and-forget）
        if let Some(sender) = self.existing_sender(subject)? {
            let _ = sender.send(payload);
        }
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>, BusError> {
        let receiver = self.sender(subject)?.subscribe();
        Ok(Box::new(InMemorySubscription {
            subject: subject.to_string(),
            receiver,
        }))
    }
}

struct InMemorySubscription {
    subject: String,
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl Subscription for InMemorySubscription {
    fn subject(&self) -> &str {
        &self.subject
    }

    async fn next_message(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Some(payload),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(subject = %self.subject, skipped, "subscriber lagged; messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
