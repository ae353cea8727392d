use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Connection factory for the token feed. The tracker only ever talks to
/// these two traits, so tests drive it with a scripted fake instead of a
/// live socket.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError>;
}

#[async_trait]
pub trait FeedConnection: Send {
    async fn send(&mut self, text: &str) -> Result<(), FeedError>;

    /// Next text frame, or `None` once the connection is gone.
    async fn next(&mut self) -> Option<String>;
}

pub struct PumpPortalTransport {
    url: String,
}

impl PumpPortalTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl FeedTransport for PumpPortalTransport {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError> {
        info!("Connecting to feed WebSocket: {}", self.url);

        let (ws_stream, response) = connect_async(&self.url).await?;
        debug!("feed handshake status: {}", response.status());

        let (write, read) = ws_stream.split();
        Ok(Box::new(WsConnection { write, read }))
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WsConnection {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

#[async_trait]
impl FeedConnection for WsConnection {
    async fn send(&mut self, text: &str) -> Result<(), FeedError> {
        self.write.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    async fn next(&mut self) -> Option<String> {
        while let Some(msg) = self.read.next().await {
            match msg {
                Ok(Message::Text(text)) => return Some(text.to_string()),
                Ok(Message::Ping(data)) => {
                    debug!("🏓 Ping");
                    let _ = self.write.send(Message::Pong(data)).await;
                }
                Ok(Message::Close(frame)) => {
                    warn!("⚠️ WebSocket closed: {:?}", frame);
                    return None;
                }
                Err(e) => {
                    error!("❌ WebSocket error: {}", e);
                    return None;
                }
                _ => {}
            }
        }
        None
    }
}
