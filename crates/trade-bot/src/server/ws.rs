//! WebSocket transport
//!
//! One connection is one conversation: each accepted socket gets a fresh
//! session id, so turns for that session are serialized by the connection
//! task. The wire format is a small JSON envelope: clients send
//! `{"text": "..."}` (or `{"action": "stop"}` to hang up), the bot replies
//! `{"bot": "...", "user": "..."}`.

use crate::bot::OrderBot;
use crate::error::{BotError, Result};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};
use uuid::Uuid;

/// Inbound client envelope
#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    action: Option<String>,
}

/// Outbound bot envelope
#[derive(Debug, Serialize)]
struct BotEnvelope<'a> {
    bot: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

/// Accept WebSocket connections on `bind` and serve conversations forever
pub async fn serve(bot: OrderBot, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(%bind, "websocket server listening");
    run(listener, bot).await
}

/// Serve conversations on an already-bound listener
///
/// A failed accept is logged and the loop keeps going; only the initial
/// bind in [`serve`] is fatal.
pub async fn run(listener: TcpListener, bot: OrderBot) -> Result<()> {
    let bot = Arc::new(bot);
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(handle_connection(Arc::clone(&bot), stream, peer));
            }
            Err(error) => {
                warn!(%error, "accept failed");
            }
        }
    }
}

async fn handle_connection(bot: Arc<OrderBot>, stream: TcpStream, peer: SocketAddr) {
    let mut ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(error) => {
            warn!(%peer, %error, "websocket handshake failed");
            return;
        }
    };

    let session_id = Uuid::new_v4().to_string();
    info!(%peer, session = %session_id, "connection opened");

    if send_reply(&mut ws, bot.welcome(), None).await.is_err() {
        return;
    }

    while let Some(message) = ws.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(error) => {
                warn!(%peer, %error, "websocket read failed");
                break;
            }
        };

        let envelope: ClientEnvelope = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(error) => {
                if send_reply(&mut ws, &format!("Error: {error}"), None)
                    .await
                    .is_err()
                {
                    break;
                }
                continue;
            }
        };

        if envelope.action.as_deref() == Some("stop") {
            break;
        }

        let input = envelope.text.unwrap_or_default();
        let reply = bot.handle_message(&session_id, &input).await;
        let sent = match reply {
            Ok(reply) => send_reply(&mut ws, &reply, Some(&input)).await,
            // Turn-level failure: report it, leave the session intact.
            Err(error) => send_reply(&mut ws, &format!("Error: {error}"), Some(&input)).await,
        };
        if sent.is_err() {
            break;
        }
    }

    bot.end_session(&session_id);
    info!(%peer, session = %session_id, "connection closed");
}

async fn send_reply(
    ws: &mut WebSocketStream<TcpStream>,
    bot_text: &str,
    user: Option<&str>,
) -> Result<()> {
    let payload = serde_json::to_string(&BotEnvelope {
        bot: bot_text,
        user,
    })?;
    ws.send(Message::Text(payload))
        .await
        .map_err(|e| BotError::Other(format!("websocket send failed: {e}")))
}
