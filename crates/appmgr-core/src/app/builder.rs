//! AppBuilder - ports を組み合わせて App を作る
//!
//! # Fail-fast 設計
//! - bus と store は必須。足りなければ build() で BuildError を返す
//! - EventSink と Clock は省略可（TracingEventSink / SystemClock）

use std::sync::Arc;

use crate::app::handler::DesireHandler;
use crate::app::listener::DesireListener;
use crate::config::AppConfig;
use crate::domain::DESIRE_APP_SUBJECT;
use crate::impls::TracingEventSink;
use crate::ports::{BusError, Clock, DesiredLrpStore, EventSink, MessageBus, SystemClock, UlidGenerator};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .bus(bus)
///     .store(store)
///     .build()?;
/// let listener = app.start().await?;
/// ```
pub struct AppBuilder {
    bus: Option<Arc<dyn MessageBus>>,
    store: Option<Arc<dyn DesiredLrpStore>>,
    events: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
    subject: String,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no message bus configured")]
    MissingBus,

    #[error("no desired lrp store configured")]
    MissingStore,

    #[error("subject must not be empty")]
    EmptySubject,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            bus: None,
            store: None,
            events: None,
            clock: None,
            subject: DESIRE_APP_SUBJECT.to_string(),
        }
    }

    /// 設定から subject を引き継いだ builder
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new().subject(config.subject.clone())
    }

    pub fn bus(mut self, bus: Arc<dyn MessageBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn store(mut self, store: Arc<dyn DesiredLrpStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let bus = self.bus.ok_or(BuildError::MissingBus)?;
        let store = self.store.ok_or(BuildError::MissingStore)?;
        if self.subject.is_empty() {
            return Err(BuildError::EmptySubject);
        }

        let events: Arc<dyn EventSink> = match self.events {
            Some(events) => events,
            None => Arc::new(TracingEventSink),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));

        Ok(App {
            bus,
            subject: self.subject,
            handler: Arc::new(DesireHandler::new(store, events, clock, ids)),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wired application: a bus subject bound to the desire pipeline.
pub struct App {
    bus: Arc<dyn MessageBus>,
    subject: String,
    handler: Arc<DesireHandler>,
}

impl App {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn handler(&self) -> &Arc<DesireHandler> {
        &self.handler
    }

    /// Subscribe and start the listener.
    pub async fn start(&self) -> Result<DesireListener, BusError> {
        let subscription = self.bus.subscribe(&self.subject).await?;
        Ok(DesireListener::spawn(subscription, Arc::clone(&self.handler)))
    }
}
