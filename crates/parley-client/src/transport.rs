//! Websocket transport for the chat service.
//!
//! Provides [`ChatSocket`], the single connection handle per view. This is
//! a thin layer that moves events between channels and the socket; all
//! rendering decisions stay in the application layer.
//!
//! A spawned supervisor task owns the socket for the handle's whole life:
//! it dials, pumps traffic, and on connection loss runs the reconnect
//! schedule from [`crate::ConnectConfig`]. Reconnection replaces the
//! socket inside the task, so at no point do two sockets exist for one
//! handle.

use std::time::Duration;

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use parley_proto::{ClientEvent, ServerEvent};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc, time};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::ConnectConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Connection lifecycle and inbound traffic, as seen by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Initial connection established.
    Connected,

    /// Connection lost. Reconnection follows per configuration.
    Disconnected {
        /// Close reason, when the peer supplied one.
        reason: Option<String>,
    },

    /// A reconnect attempt is starting.
    ReconnectAttempt {
        /// 1-based attempt count.
        attempt: u32,
    },

    /// Connection re-established after a loss.
    Reconnected,

    /// Every reconnect attempt failed. The supervisor exits after this.
    ReconnectFailed,

    /// A dial failed.
    ConnectError {
        /// Human-readable failure description.
        message: String,
    },

    /// Decoded service event.
    Event(ServerEvent),
}

/// Handle to the live chat connection.
///
/// Dropping the handle (or calling [`ChatSocket::stop`]) ends supervision;
/// the view must not outlive its socket, nor the socket its view.
pub struct ChatSocket {
    /// Send events to the service. Fire-and-forget: there is no delivery
    /// acknowledgement, and events submitted while the connection is down
    /// are dropped when it returns, not replayed.
    pub to_server: mpsc::Sender<ClientEvent>,

    /// Lifecycle transitions and inbound events.
    pub from_server: mpsc::Receiver<TransportEvent>,

    /// Abort handle to stop the supervisor task.
    abort_handle: tokio::task::AbortHandle,
}

impl ChatSocket {
    /// Tear the connection down.
    ///
    /// Aborts the supervisor task; nothing is sent or delivered afterwards.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ChatSocket {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open the chat connection and spawn its supervisor task.
///
/// Returns immediately; the first [`TransportEvent`] on the handle reports
/// how the dial went. Must be called within a tokio runtime.
pub fn connect(url: impl Into<String>, config: ConnectConfig) -> ChatSocket {
    let (to_server_tx, to_server_rx) = mpsc::channel(32);
    let (from_server_tx, from_server_rx) = mpsc::channel(64);

    let handle = tokio::spawn(supervise(url.into(), config, to_server_rx, from_server_tx));

    ChatSocket {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    }
}

/// Why a pump cycle ended.
enum PumpEnd {
    /// The handle was dropped; supervision is over.
    HandleDropped,
    /// The socket dropped; reconnection may follow.
    ConnectionLost(Option<String>),
}

async fn supervise(
    url: String,
    config: ConnectConfig,
    mut to_server: mpsc::Receiver<ClientEvent>,
    events: mpsc::Sender<TransportEvent>,
) {
    let mut socket = match dial(&url, config.connect_timeout).await {
        Ok(socket) => {
            tracing::info!(%url, "connected");
            if !emit(&events, TransportEvent::Connected).await {
                return;
            }
            socket
        },
        Err(e) => {
            tracing::warn!(%url, %e, "initial connection failed");
            if !emit(&events, TransportEvent::ConnectError { message: e.to_string() }).await {
                return;
            }
            match reconnect(&url, &config, &mut to_server, &events).await {
                Some(socket) => socket,
                None => return,
            }
        },
    };

    loop {
        let (mut sink, mut stream) = socket.split();

        match pump(&mut sink, &mut stream, &mut to_server, &events).await {
            PumpEnd::HandleDropped => {
                let _ = sink.close().await;
                return;
            },
            PumpEnd::ConnectionLost(reason) => {
                tracing::info!(?reason, "connection lost");
                if !emit(&events, TransportEvent::Disconnected { reason }).await {
                    return;
                }
                match reconnect(&url, &config, &mut to_server, &events).await {
                    Some(new_socket) => socket = new_socket,
                    None => return,
                }
            },
        }
    }
}

/// Move traffic between the channels and the socket until one side drops.
async fn pump(
    sink: &mut SplitSink<WsStream, Message>,
    stream: &mut SplitStream<WsStream>,
    to_server: &mut mpsc::Receiver<ClientEvent>,
    events: &mpsc::Sender<TransportEvent>,
) -> PumpEnd {
    loop {
        tokio::select! {
            outbound = to_server.recv() => match outbound {
                Some(event) => {
                    let raw = match event.to_json() {
                        Ok(raw) => raw,
                        Err(e) => {
                            tracing::error!(%e, "failed to encode outbound event");
                            continue;
                        },
                    };
                    if let Err(e) = sink.send(Message::Text(raw)).await {
                        return PumpEnd::ConnectionLost(Some(e.to_string()));
                    }
                },
                None => return PumpEnd::HandleDropped,
            },

            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(raw))) => match ServerEvent::from_json(&raw) {
                    Ok(event) => {
                        if !emit(events, TransportEvent::Event(event)).await {
                            return PumpEnd::HandleDropped;
                        }
                    },
                    Err(e) => tracing::warn!(%e, "ignoring malformed frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason =
                        frame.map(|f| f.reason.to_string()).filter(|r| !r.is_empty());
                    return PumpEnd::ConnectionLost(reason);
                },
                // Ping/pong are answered by the websocket layer; the
                // service never sends binary frames.
                Some(Ok(_)) => {},
                Some(Err(e)) => return PumpEnd::ConnectionLost(Some(e.to_string())),
                None => return PumpEnd::ConnectionLost(None),
            },
        }
    }
}

/// Run the reconnect schedule until a dial succeeds or attempts run out.
///
/// Returns the new socket, or `None` when supervision should end (gave up,
/// disabled, or the handle went away).
async fn reconnect(
    url: &str,
    config: &ConnectConfig,
    to_server: &mut mpsc::Receiver<ClientEvent>,
    events: &mpsc::Sender<TransportEvent>,
) -> Option<WsStream> {
    if !config.reconnect {
        tracing::info!("reconnection disabled, supervisor exiting");
        return None;
    }

    for attempt in 1..=config.max_attempts {
        if !emit(events, TransportEvent::ReconnectAttempt { attempt }).await {
            return None;
        }
        time::sleep(config.backoff_delay(attempt)).await;

        match dial(url, config.connect_timeout).await {
            Ok(socket) => {
                tracing::info!(attempt, "reconnected");
                drain_stale(to_server);
                if !emit(events, TransportEvent::Reconnected).await {
                    return None;
                }
                return Some(socket);
            },
            Err(e) => {
                tracing::warn!(attempt, %e, "reconnect attempt failed");
                if !emit(events, TransportEvent::ConnectError { message: e.to_string() }).await {
                    return None;
                }
            },
        }
    }

    tracing::error!(attempts = config.max_attempts, "giving up on reconnection");
    let _ = emit(events, TransportEvent::ReconnectFailed).await;
    None
}

async fn dial(url: &str, timeout: Duration) -> Result<WsStream, TransportError> {
    match time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((socket, _response))) => Ok(socket),
        Ok(Err(e)) => Err(TransportError::Connection(e.to_string())),
        Err(_) => Err(TransportError::Connection(format!("dial timed out after {timeout:?}"))),
    }
}

/// Drop events composed while the connection was down. The service does
/// not replay, so forwarding them late would only misorder the room.
fn drain_stale(to_server: &mut mpsc::Receiver<ClientEvent>) {
    while let Ok(event) = to_server.try_recv() {
        tracing::warn!(?event, "dropping event composed while disconnected");
    }
}

/// Deliver an event to the view. False when the handle is gone.
async fn emit(events: &mpsc::Sender<TransportEvent>, event: TransportEvent) -> bool {
    events.send(event).await.is_ok()
}
