//! DesireListener - bus の購読とパイプラインをつなぐループ
//!
//! - 受け取った payload ごとに task を spawn する（bus は配送を直列化しない前提）
//! - 1 メッセージの失敗（panic 含む）で listener は止まらない
//! - `shutdown_tx` に true を送ると新しいメッセージの受信をやめ、処理中のものを待って終わる

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::app::handler::DesireHandler;
use crate::ports::Subscription;

/// Listener handle.
pub struct DesireListener {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl DesireListener {
    /// Start listening on `subscription`.
    pub fn spawn(subscription: Box<dyn Subscription>, handler: Arc<DesireHandler>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(listen_loop(subscription, handler, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Stop taking new messages. In-flight handlers are not cancelled.
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for in-flight handlers.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(err) = self.join.await {
            error!(error = %err, "desire listener join failed");
        }
    }
}

async fn listen_loop(
    mut subscription: Box<dyn Subscription>,
    handler: Arc<DesireHandler>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let subject = subscription.subject().to_string();
    info!(%subject, "listening for desire messages");

    let mut in_flight = JoinSet::new();
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let payload = tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender が drop されたら終了
                if changed.is_err() {
                    break;
                }
                continue;
            }
            payload = subscription.next_message() => payload,
        };

        let Some(payload) = payload else {
            debug!(%subject, "subscription closed");
            break;
        };

        let handler = Arc::clone(&handler);
        in_flight.spawn(async move {
            // 結果は handler が EventSink に報告済み
            let _ = handler.handle(&payload).await;
        });

        while let Some(joined) = in_flight.try_join_next() {
            if let Err(err) = joined {
                error!(%subject, error = %err, "desire handler task failed");
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(err) = joined {
            error!(%subject, error = %err, "desire handler task failed");
        }
    }
    info!(%subject, "desire listener stopped");
}
