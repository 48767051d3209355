use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::ClientConfig;
use crate::error::{MiniqError, Result};
use crate::protocol::message::{Request, Response};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Executes request/response exchanges against the queue server.
///
/// Every call to [`execute`](QueueClient::execute) opens a fresh connection,
/// performs exactly one exchange, and tears the connection down again. No
/// state survives between calls.
pub struct QueueClient {
    config: ClientConfig,
}

impl QueueClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Perform one exchange: send `request`, await the reply, close.
    ///
    /// A reply with a non-OK status becomes [`MiniqError::Remote`] carrying
    /// the reply verbatim. The connection is closed on every path once it
    /// has been established, including timeouts and error replies.
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        let endpoint = self.config.endpoint();
        tracing::debug!(%endpoint, action = request.action(), "Connecting");

        let (mut socket, _) = self
            .bounded("connect", async {
                connect_async(endpoint.as_str()).await.map_err(MiniqError::from)
            })
            .await?;

        let outcome = self.bounded("exchange", exchange(&mut socket, request)).await;

        // The exchange outcome wins over any close failure.
        let _ = socket.close(None).await;
        outcome
    }

    async fn bounded<T>(&self, phase: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.unwrap_or_else(|_| {
                Err(MiniqError::Connection(format!(
                    "{phase} timed out after {}s",
                    limit.as_secs()
                )))
            }),
            None => fut.await,
        }
    }
}

async fn exchange(socket: &mut WsStream, request: &Request) -> Result<Response> {
    let frame = serde_json::to_string(request)
        .map_err(|err| MiniqError::Protocol(format!("cannot encode request: {err}")))?;
    socket.send(Message::Text(frame)).await?;

    loop {
        let message = match socket.next().await {
            Some(Ok(message)) => message,
            Some(Err(err)) => return Err(err.into()),
            None => {
                return Err(MiniqError::Connection(
                    "connection closed before a reply arrived".to_string(),
                ))
            }
        };

        let reply = match message {
            Message::Text(text) => decode_response(text.as_bytes())?,
            Message::Binary(bytes) => decode_response(&bytes)?,
            // Control frames are not the reply.
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                return Err(MiniqError::Connection(
                    "server closed the connection before replying".to_string(),
                ))
            }
            Message::Frame(_) => {
                return Err(MiniqError::Protocol("unexpected raw frame".to_string()))
            }
        };

        tracing::debug!(status = %reply.status, "Reply received");
        return if reply.is_ok() {
            Ok(reply)
        } else {
            Err(MiniqError::Remote(reply))
        };
    }
}

fn decode_response(bytes: &[u8]) -> Result<Response> {
    serde_json::from_slice(bytes)
        .map_err(|err| MiniqError::Protocol(format!("invalid response frame: {err}")))
}
