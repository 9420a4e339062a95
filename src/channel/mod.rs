//! Push channel with unconditional, unbounded reconnection.
//!
//! State machine: `Idle -> Connecting -> Connected -> Disconnected -> Connecting -> ...`.
//! Every drop (including a failed open) schedules exactly one reconnect attempt
//! after the policy delay. Only [`ReconnectingChannel::close`] stops the loop.

pub mod transport;

use crate::config::Config;
use crate::telemetry::PushMessage;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use transport::{FrameStream, PushTransport, TransportFrame, WsTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChannelState {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// What the connection indicator shows. `Error` is reported without leaving the
/// current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

impl ConnectionStatus {
    pub fn label(&self) -> &str {
        match self {
            ConnectionStatus::Idle => "Idle",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Error(_) => "Connection Error",
        }
    }
}

impl From<ChannelState> for ConnectionStatus {
    fn from(state: ChannelState) -> Self {
        match state {
            ChannelState::Idle => ConnectionStatus::Idle,
            ChannelState::Connecting => ConnectionStatus::Connecting,
            ChannelState::Connected => ConnectionStatus::Connected,
            ChannelState::Disconnected => ConnectionStatus::Disconnected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Status(ConnectionStatus),
    Message(PushMessage),
    /// `attempt` counts drops since the last successful open.
    ReconnectScheduled { attempt: u32, delay: Duration },
}

/// Delay before reconnect attempt `n` is `delay * multiplier^(n-1)`, capped at
/// `max_delay`. A multiplier of 1.0 gives the fixed-delay policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_delay: delay,
            multiplier: 1.0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: config.reconnect_delay,
            max_delay: config.reconnect_max_delay.max(config.reconnect_delay),
            multiplier: config.reconnect_multiplier.max(1.0),
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

pub struct ReconnectingChannel {
    transport: Arc<dyn PushTransport>,
    policy: ReconnectPolicy,
    events: mpsc::UnboundedSender<ChannelEvent>,
    state: Arc<watch::Sender<ChannelState>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReconnectingChannel {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        policy: ReconnectPolicy,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Self {
        let (state, _) = watch::channel(ChannelState::Idle);
        Self {
            transport,
            policy,
            events,
            state: Arc::new(state),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Starts the connection loop. Does nothing while a loop is already running.
    pub fn connect(&mut self, url: impl Into<String>) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!(state = %self.state(), "connect ignored, channel already active");
            return;
        }

        self.cancel = CancellationToken::new();
        let worker = Worker {
            url: url.into(),
            transport: self.transport.clone(),
            policy: self.policy,
            events: self.events.clone(),
            state: self.state.clone(),
            cancel: self.cancel.clone(),
        };
        self.task = Some(tokio::spawn(worker.run()));
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ChannelState> {
        self.state.subscribe()
    }

    /// Tears the connection down and clears any pending reconnect timer. No
    /// status event is emitted for this close.
    pub async fn close(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.state.send_replace(ChannelState::Idle);
        info!("push channel closed");
    }
}

impl Drop for ReconnectingChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker {
    url: String,
    transport: Arc<dyn PushTransport>,
    policy: ReconnectPolicy,
    events: mpsc::UnboundedSender<ChannelEvent>,
    state: Arc<watch::Sender<ChannelState>>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        let mut failures: u32 = 0;

        loop {
            self.transition(ChannelState::Connecting);

            let opened = tokio::select! {
                _ = self.cancel.cancelled() => return,
                opened = self.transport.open(&self.url) => opened,
            };

            match opened {
                Ok(mut frames) => {
                    failures = 0;
                    self.transition(ChannelState::Connected);
                    info!(url = %self.url, "push channel connected");

                    loop {
                        let frame = tokio::select! {
                            _ = self.cancel.cancelled() => return,
                            frame = frames.next() => frame,
                        };
                        match frame {
                            Some(TransportFrame::Text(text)) => self.deliver(&text),
                            Some(TransportFrame::Error(err)) => {
                                warn!(error = %err, "push channel protocol error");
                                self.emit(ChannelEvent::Status(ConnectionStatus::Error(err)));
                            }
                            None => break,
                        }
                    }
                }
                Err(e) => warn!(url = %self.url, error = %e, "push channel failed to open"),
            }

            self.transition(ChannelState::Disconnected);
            failures = failures.saturating_add(1);
            let delay = self.policy.delay_for(failures);
            info!(attempt = failures, delay = ?delay, "push channel disconnected, reconnect scheduled");
            self.emit(ChannelEvent::ReconnectScheduled {
                attempt: failures,
                delay,
            });

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn deliver(&self, text: &str) {
        match PushMessage::decode(text) {
            Ok(message) => {
                debug!(kind = message.kind(), "push message received");
                self.emit(ChannelEvent::Message(message));
            }
            Err(e) => warn!(error = %e, "discarding malformed push payload"),
        }
    }

    fn transition(&self, state: ChannelState) {
        self.state.send_replace(state);
        self.emit(ChannelEvent::Status(state.into()));
    }

    fn emit(&self, event: ChannelEvent) {
        let _ = self.events.send(event);
    }
}
