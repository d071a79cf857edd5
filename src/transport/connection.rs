//! DevTools WebSocket connection.
//!
//! One background task owns the socket. Callers hand it requests over a
//! channel and wait on a oneshot keyed by the request id; everything the
//! browser sends without an id is an event and goes to the installed
//! [`EventHandler`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{Command, Event, EventReply, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// How long a command may wait for its response.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// In-flight request cap.
const MAX_IN_FLIGHT: usize = 100;

// ============================================================================
// Types
// ============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type Waiter = oneshot::Sender<Result<Response>>;

/// Callback for browser events.
///
/// Runs on the socket task, so it must return quickly. A returned
/// [`EventReply`] is sent back without waiting for its response.
pub type EventHandler = Box<dyn Fn(Event) -> Option<EventReply> + Send + Sync>;

enum Outgoing {
    Request(Request, Waiter),
    Forget(u64),
    Close,
}

/// State shared between handles and the socket task.
#[derive(Default)]
struct Shared {
    waiters: Mutex<FxHashMap<u64, Waiter>>,
    handler: Mutex<Option<EventHandler>>,
    next_id: AtomicU64,
}

impl Shared {
    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn fail_all(&self) {
        let waiters: Vec<Waiter> = self.waiters.lock().drain().map(|(_, tx)| tx).collect();
        if !waiters.is_empty() {
            debug!(count = waiters.len(), "Failing in-flight requests");
        }
        for tx in waiters {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to a DevTools WebSocket. Clones share the socket task.
#[derive(Clone)]
pub struct Connection {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    shared: Arc<Shared>,
}

impl Connection {
    /// Opens the WebSocket and starts the socket task.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] if the handshake fails.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| Error::connection(format!("{ws_url}: {e}")))?;
        debug!(url = %ws_url, "DevTools connected");

        let (outgoing, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::default());
        tokio::spawn(SocketTask::new(Arc::clone(&shared)).run(stream, rx));

        Ok(Self { outgoing, shared })
    }

    /// Installs the event callback, replacing any previous one.
    pub fn set_event_handler(&self, handler: EventHandler) {
        *self.shared.handler.lock() = Some(handler);
    }

    /// Sends `command`, optionally routed to a page session, and returns its
    /// `result` object.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the socket is gone
    /// - [`Error::ConnectionTimeout`] after [`DEFAULT_COMMAND_TIMEOUT`]
    /// - [`Error::Protocol`] if the browser answers with an error or too many
    ///   requests are in flight
    pub async fn execute(&self, session_id: Option<&str>, command: Command) -> Result<Value> {
        let id = self.shared.allocate_id();
        let request = match session_id {
            Some(session) => Request::for_session(id, session, command),
            None => Request::new(id, command),
        };
        self.round_trip(request, DEFAULT_COMMAND_TIMEOUT).await?.into_result()
    }

    async fn round_trip(&self, request: Request, wait: Duration) -> Result<Response> {
        let in_flight = self.pending_count();
        if in_flight >= MAX_IN_FLIGHT {
            warn!(in_flight, "Request cap reached");
            return Err(Error::protocol(format!("{in_flight} requests already in flight")));
        }

        let id = request.id;
        let method = request.command.method();
        let (tx, rx) = oneshot::channel();
        self.outgoing
            .send(Outgoing::Request(request, tx))
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(wait, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self.outgoing.send(Outgoing::Forget(id));
                Err(Error::connection_timeout(method, wait.as_millis() as u64))
            }
        }
    }

    /// Requests awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.waiters.lock().len()
    }

    /// Closes the socket. Clones share it, so this is never done on drop.
    pub fn shutdown(&self) {
        let _ = self.outgoing.send(Outgoing::Close);
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SocketTask
// ============================================================================

struct SocketTask {
    shared: Arc<Shared>,
}

impl SocketTask {
    fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    async fn run(self, stream: WsStream, mut rx: mpsc::UnboundedReceiver<Outgoing>) {
        let (mut sink, mut source) = stream.split();

        loop {
            tokio::select! {
                incoming = source.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = self.dispatch(&text) {
                            let request = Request {
                                id: self.shared.allocate_id(),
                                session_id: reply.session_id,
                                command: reply.command,
                            };
                            if let Err(e) = Self::write(&mut sink, &request).await {
                                warn!(error = %e, "Event reply not sent");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("DevTools socket closed");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "DevTools socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                },

                outgoing = rx.recv() => match outgoing {
                    Some(Outgoing::Request(request, tx)) => self.send(&mut sink, request, tx).await,
                    Some(Outgoing::Forget(id)) => {
                        self.shared.waiters.lock().remove(&id);
                        trace!(id, "Dropped timed-out waiter");
                    }
                    Some(Outgoing::Close) | None => {
                        let _ = sink.close().await;
                        break;
                    }
                },
            }
        }

        self.shared.fail_all();
        debug!("Socket task finished");
    }

    /// Routes one text frame. Responses carry an id, events never do.
    fn dispatch(&self, text: &str) -> Option<EventReply> {
        if let Ok(response) = serde_json::from_str::<Response>(text) {
            match self.shared.waiters.lock().remove(&response.id) {
                Some(tx) => {
                    let _ = tx.send(Ok(response));
                }
                None => trace!(id = response.id, "Untracked response"),
            }
            return None;
        }

        match serde_json::from_str::<Event>(text) {
            Ok(event) => self.shared.handler.lock().as_ref().and_then(|handler| handler(event)),
            Err(_) => {
                warn!(text = %text, "Unrecognized DevTools frame");
                None
            }
        }
    }

    async fn send(&self, sink: &mut WsSink, request: Request, tx: Waiter) {
        let id = request.id;
        self.shared.waiters.lock().insert(id, tx);

        if let Err(e) = Self::write(sink, &request).await
            && let Some(tx) = self.shared.waiters.lock().remove(&id)
        {
            let _ = tx.send(Err(e));
        }
        trace!(id, method = request.command.method(), "Request sent");
    }

    async fn write(sink: &mut WsSink, request: &Request) -> Result<()> {
        let json = serde_json::to_string(request)?;
        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| Error::connection(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
