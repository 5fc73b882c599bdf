//! MessageBus port - publish/subscribe の抽象化
//!
//! 配送は fire-and-forget。購読側は ack しないし、再配送もされない。
//! 購読者がいない subject への publish はエラーではなく、単に誰にも届かない。

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("subject must not be empty")]
    EmptySubject,

    #[error("bus operation failed: {0}")]
    OperationFailed(String),
}

/// A stream of raw payloads for one subject.
#[async_trait]
pub trait Subscription: Send {
    fn subject(&self) -> &str;

    /// Wait for the next payload. `None` means the bus is gone.
    async fn next_message(&mut self) -> Option<Vec<u8>>;
}

#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError>;

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>, BusError>;
}
