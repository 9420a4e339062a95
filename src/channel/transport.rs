use crate::error::{AppError, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

/// What a live connection yields. The stream ending means the connection closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFrame {
    Text(String),
    /// A protocol-level error. The connection may still be open; closure is
    /// only signalled by the end of the stream.
    Error(String),
}

pub type FrameStream = BoxStream<'static, TransportFrame>;

#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn open(&self, url: &str) -> Result<FrameStream>;
}

/// WebSocket transport over tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn open(&self, url: &str) -> Result<FrameStream> {
        let (socket, response) = connect_async(url)
            .await
            .map_err(|e| AppError::Transport(format!("connect to {} failed: {}", url, e)))?;
        debug!(status = %response.status(), "websocket handshake complete");

        let frames = socket.filter_map(|item| async move {
            match item {
                Ok(Message::Text(text)) => Some(TransportFrame::Text(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => Some(TransportFrame::Text(text)),
                    Err(_) => Some(TransportFrame::Error(
                        "binary frame is not valid UTF-8".to_string(),
                    )),
                },
                Ok(_) => None,
                Err(e) => Some(TransportFrame::Error(e.to_string())),
            }
        });

        Ok(frames.boxed())
    }
}
