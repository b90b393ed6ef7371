//! Reconnecting event channel.
//!
//! Wraps a raw transport in a disconnected -> connecting -> connected state
//! machine with capped exponential backoff, so the orchestrator only ever
//! sees `publish` and inbound dispatch. Transport details (sockets, framing)
//! stay outside this crate.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::backoff::Backoff;
use crate::events::{EventPublisher, ZoneEvent};

/// Connection state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

/// Raw transport the channel drives. One call to `connect` per reconnect
/// attempt; `send` delivers a single event on an established connection.
#[async_trait]
pub trait EventTransport: Send + Sync {
    async fn connect(&self) -> anyhow::Result<()>;
    async fn send(&self, event: &ZoneEvent) -> anyhow::Result<()>;
}

type InboundHandler = Box<dyn Fn(ZoneEvent) + Send + Sync>;

pub struct ReconnectingChannel<T> {
    transport: T,
    state: Mutex<ChannelState>,
    backoff: Mutex<Backoff>,
    failed_attempts: AtomicU32,
    max_attempts: u32,
    on_message: StdMutex<Option<InboundHandler>>,
}

impl<T: EventTransport> ReconnectingChannel<T> {
    pub fn new(transport: T, max_attempts: u32) -> Self {
        Self {
            transport,
            state: Mutex::new(ChannelState::Disconnected),
            backoff: Mutex::new(Backoff::new(
                Duration::from_millis(250),
                Duration::from_secs(30),
            )),
            failed_attempts: AtomicU32::new(0),
            max_attempts,
            on_message: StdMutex::new(None),
        }
    }

    pub async fn state(&self) -> ChannelState {
        *self.state.lock().await
    }

    /// Register the inbound handler. Control messages from other instances
    /// arrive through here.
    pub fn set_on_message(&self, handler: impl Fn(ZoneEvent) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.on_message.lock() {
            *slot = Some(Box::new(handler));
        }
    }

    /// Hand an inbound event to the registered handler, if any.
    pub fn dispatch_inbound(&self, event: ZoneEvent) {
        if let Ok(slot) = self.on_message.lock() {
            if let Some(handler) = slot.as_ref() {
                handler(event);
            }
        }
    }

    /// Drive the state machine toward `Connected`. Returns false when the
    /// channel is still down (backoff pending or attempts exhausted).
    async fn ensure_connected(&self) -> bool {
        {
            let state = self.state.lock().await;
            if *state == ChannelState::Connected {
                return true;
            }
        }

        if self.failed_attempts.load(Ordering::Relaxed) >= self.max_attempts {
            return false;
        }

        {
            let backoff = self.backoff.lock().await;
            if !backoff.ready() {
                return false;
            }
        }

        *self.state.lock().await = ChannelState::Connecting;

        match self.transport.connect().await {
            Ok(()) => {
                *self.state.lock().await = ChannelState::Connected;
                self.backoff.lock().await.reset();
                self.failed_attempts.store(0, Ordering::Relaxed);
                tracing::info!("event channel connected");
                true
            }
            Err(err) => {
                *self.state.lock().await = ChannelState::Disconnected;
                let attempt = self.failed_attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let delay = self.backoff.lock().await.fail();
                tracing::warn!(
                    "event channel connect failed (attempt {}/{}): {}; retrying in {:?}",
                    attempt,
                    self.max_attempts,
                    err,
                    delay
                );
                false
            }
        }
    }
}

#[async_trait]
impl<T: EventTransport> EventPublisher for ReconnectingChannel<T> {
    async fn publish(&self, event: &ZoneEvent) -> anyhow::Result<()> {
        if !self.ensure_connected().await {
            anyhow::bail!("event channel unavailable");
        }

        if let Err(err) = self.transport.send(event).await {
            *self.state.lock().await = ChannelState::Disconnected;
            self.backoff.lock().await.fail();
            return Err(err);
        }

        Ok(())
    }
}
