//! WebSocket JSON-RPC client for the Dart VM service

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use super::error::VmError;
use crate::rpc::{Message, RequestId};

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The service's "stream already subscribed" error code, swallowed by
/// [`VmServiceClient::stream_listen`]
const STREAM_ALREADY_SUBSCRIBED: i32 = 103;

/// Capacity of the outgoing write queue
const WRITE_QUEUE_CAPACITY: usize = 64;

/// How long a close handshake may take before the receive loop is aborted
const CLOSE_GRACE: Duration = Duration::from_millis(100);

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection
    Disconnected,
    /// Handshake in progress
    Connecting,
    /// Connected and serving requests
    Connected,
    /// Close requested, waiting for the receive loop to drain
    Disconnecting,
}

/// An event delivered to the registered event callback
#[derive(Debug, Clone)]
pub enum VmEvent {
    /// A `streamNotify` notification from the service
    Stream {
        /// Stream identifier (e.g. "Isolate", "Extension")
        stream_id: String,
        /// Event payload, verbatim
        event: Value,
    },
    /// The connection closed (emitted once, from any state)
    Closed,
}

/// Callback invoked for every stream event, under its own mutex
pub type EventCallback = Box<dyn Fn(VmEvent) + Send + Sync>;

/// One-shot completion slot for an in-flight request
type PendingSender = oneshot::Sender<super::Result<Value>>;

/// Messages accepted by the writer task
enum WriteCommand {
    Text(String),
    Close,
}

/// A connected VM service client.
///
/// Exclusively owns a single WebSocket connection. Writes are serialized
/// through a queue; responses are correlated to callers by request id, so
/// concurrent calls never observe each other's results. Dropping the client
/// tears the connection down and fails anything still pending.
pub struct VmServiceClient {
    /// The WebSocket URI this client connected to
    ws_uri: String,

    /// Outgoing write queue feeding the writer task
    outgoing_tx: mpsc::Sender<WriteCommand>,

    /// In-flight requests by id
    pending: Arc<Mutex<HashMap<i64, PendingSender>>>,

    /// Monotonically increasing request id, starting at 1
    next_request_id: AtomicI64,

    /// Main isolate id, cached at connect time
    main_isolate_id: StdMutex<Option<String>>,

    /// Event callback shared with the receive loop
    event_callback: Arc<StdMutex<Option<EventCallback>>>,

    /// Lifecycle state shared with the receive loop
    state: Arc<StdMutex<ConnectionState>>,

    /// Receive loop handle, joined on disconnect
    reader_handle: Mutex<Option<JoinHandle<()>>>,

    /// Default per-call timeout
    default_timeout: Duration,
}

impl std::fmt::Debug for VmServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmServiceClient")
            .field("ws_uri", &self.ws_uri)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl VmServiceClient {
    /// Connect to a VM service endpoint.
    ///
    /// The auth token, when supplied, is appended to the URI path (the
    /// service rejects the handshake without it). On success the receive
    /// loop is started and the main isolate id is fetched and cached via
    /// `getVM`.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::ConnectFailed`] if the handshake fails and the
    /// client remains disconnected.
    pub async fn connect(uri: &str, auth_token: Option<&str>) -> super::Result<Self> {
        Self::connect_with_timeout(uri, auth_token, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await
    }

    /// Connect with a non-default per-call timeout
    pub async fn connect_with_timeout(
        uri: &str,
        auth_token: Option<&str>,
        default_timeout: Duration,
    ) -> super::Result<Self> {
        let ws_uri = build_ws_uri(uri, auth_token);
        let state = Arc::new(StdMutex::new(ConnectionState::Connecting));

        tracing::info!(uri = %ws_uri, "Connecting to VM service");

        let (ws_stream, _) = match tokio_tungstenite::connect_async(ws_uri.as_str()).await {
            Ok(connected) => connected,
            Err(e) => {
                *state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                    ConnectionState::Disconnected;
                return Err(VmError::ConnectFailed(e.to_string()));
            }
        };

        let (mut sink, mut stream) = ws_stream.split();

        let pending: Arc<Mutex<HashMap<i64, PendingSender>>> = Arc::new(Mutex::new(HashMap::new()));
        let event_callback: Arc<StdMutex<Option<EventCallback>>> = Arc::new(StdMutex::new(None));
        *state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            ConnectionState::Connected;

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<WriteCommand>(WRITE_QUEUE_CAPACITY);

        // Writer task: drains the queue so callers never contend on the sink.
        let writer_handle = tokio::spawn(async move {
            while let Some(cmd) = outgoing_rx.recv().await {
                match cmd {
                    WriteCommand::Text(text) => {
                        if let Err(e) = sink.send(WsMessage::text(text)).await {
                            tracing::warn!(error = %e, "VM service write failed");
                            break;
                        }
                    }
                    WriteCommand::Close => {
                        let _ = sink.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
        });

        // Receive loop: correlates responses, forwards stream events, and
        // on any close or error fails everything still pending.
        let reader_handle = {
            let pending = Arc::clone(&pending);
            let event_callback = Arc::clone(&event_callback);
            let state = Arc::clone(&state);

            tokio::spawn(async move {
                while let Some(msg) = stream.next().await {
                    match msg {
                        Ok(WsMessage::Text(text)) => {
                            Self::dispatch_incoming(&text, &pending, &event_callback).await;
                        }
                        Ok(WsMessage::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "VM service socket error");
                            break;
                        }
                    }
                }

                *state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                    ConnectionState::Disconnected;
                fail_all_pending(&pending).await;
                notify_event(&event_callback, VmEvent::Closed);
                writer_handle.abort();
            })
        };

        let client = Self {
            ws_uri,
            outgoing_tx,
            pending,
            next_request_id: AtomicI64::new(1),
            main_isolate_id: StdMutex::new(None),
            event_callback,
            state,
            reader_handle: Mutex::new(Some(reader_handle)),
            default_timeout,
        };

        // Cache the main isolate up front; every UI operation targets it.
        match client.get_isolate_ids().await {
            Ok(ids) => {
                if let Some(first) = ids.into_iter().next() {
                    *client
                        .main_isolate_id
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(first);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "getVM failed during connect");
                client.disconnect().await;
                return Err(VmError::ConnectFailed(e.to_string()));
            }
        }

        Ok(client)
    }

    /// Route one incoming frame to the pending table or the event callback
    async fn dispatch_incoming(
        text: &str,
        pending: &Arc<Mutex<HashMap<i64, PendingSender>>>,
        event_callback: &Arc<StdMutex<Option<EventCallback>>>,
    ) {
        let message = match Message::parse(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable frame from VM service");
                return;
            }
        };

        match message {
            Message::Response(resp) => {
                let id = match resp.id {
                    RequestId::Number(id) => id,
                    other => {
                        tracing::warn!(id = %other, "response with non-integer id discarded");
                        return;
                    }
                };

                let Some(slot) = pending.lock().await.remove(&id) else {
                    tracing::debug!(id, "response for unknown request id discarded");
                    return;
                };

                let outcome = match (resp.result, resp.error) {
                    (Some(result), None) => Ok(result),
                    (None, Some(err)) => Err(VmError::Upstream {
                        code: err.code,
                        message: err.message,
                    }),
                    _ => Err(VmError::Protocol("response carried neither result nor error".into())),
                };
                let _ = slot.send(outcome);
            }
            Message::Notification(n) if n.method == "streamNotify" => {
                let params = n.params.unwrap_or(Value::Null);
                let stream_id = params
                    .get("streamId")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let event = params.get("event").cloned().unwrap_or(Value::Null);
                notify_event(event_callback, VmEvent::Stream { stream_id, event });
            }
            Message::Notification(n) => {
                tracing::debug!(method = %n.method, "ignoring service notification");
            }
            Message::Request(req) => {
                tracing::debug!(method = %req.method, "ignoring service-initiated request");
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Whether the connection is currently usable
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// The WebSocket URI this client connected to
    pub fn ws_uri(&self) -> &str {
        &self.ws_uri
    }

    /// Register the event callback invoked for every stream event
    pub fn set_event_callback(&self, callback: EventCallback) {
        *self
            .event_callback
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(callback);
    }

    /// Remove the event callback
    pub fn clear_event_callback(&self) {
        *self
            .event_callback
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }

    /// Call a service method with the default timeout
    pub async fn call_service_method(&self, method: &str, params: Value) -> super::Result<Value> {
        self.call_with_timeout(method, params, self.default_timeout)
            .await
    }

    /// Call a service method with an explicit timeout.
    ///
    /// Inserts a completion slot keyed by a fresh request id, queues the
    /// frame, and waits. On timeout the slot is removed so a late response
    /// is discarded rather than delivered to the wrong caller.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> super::Result<Value> {
        if !self.is_connected() {
            return Err(VmError::NotConnected);
        }

        let id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let frame = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(id, method, "-> VM service");

        if self
            .outgoing_tx
            .send(WriteCommand::Text(frame.to_string()))
            .await
            .is_err()
        {
            self.pending.lock().await.remove(&id);
            return Err(VmError::Disconnected);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            // The slot was dropped without completing: the receive loop
            // tore down the pending table on disconnect.
            Ok(Err(_)) => Err(VmError::Disconnected),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(VmError::Timeout {
                    method: method.to_string(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }

    /// Fetch the VM description (`getVM`)
    pub async fn get_vm(&self) -> super::Result<Value> {
        self.call_service_method("getVM", json!({})).await
    }

    /// Fetch the service version (`getVersion`)
    pub async fn get_version(&self) -> super::Result<Value> {
        self.call_service_method("getVersion", json!({})).await
    }

    /// List the ids of all isolates currently running
    pub async fn get_isolate_ids(&self) -> super::Result<Vec<String>> {
        let vm = self.get_vm().await?;
        let isolates = vm
            .get("isolates")
            .and_then(Value::as_array)
            .ok_or_else(|| VmError::Protocol("getVM returned no isolate list".into()))?;

        Ok(isolates
            .iter()
            .filter_map(|i| i.get("id").and_then(Value::as_str))
            .map(String::from)
            .collect())
    }

    /// The main isolate id, cached at connect time.
    ///
    /// The first isolate listed by `getVM` is taken as the main isolate;
    /// all UI operations target it.
    pub async fn get_main_isolate_id(&self) -> super::Result<String> {
        if let Some(id) = self
            .main_isolate_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
        {
            return Ok(id);
        }

        let ids = self.get_isolate_ids().await?;
        let first = ids
            .into_iter()
            .next()
            .ok_or_else(|| VmError::Protocol("target has no isolates".into()))?;

        *self
            .main_isolate_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(first.clone());
        Ok(first)
    }

    /// Fetch details for one isolate (`getIsolate`)
    pub async fn get_isolate_info(&self, isolate_id: &str) -> super::Result<Value> {
        self.call_service_method("getIsolate", json!({ "isolateId": isolate_id }))
            .await
    }

    /// Subscribe to a service event stream.
    ///
    /// Idempotent from the caller's view: the service errors on a duplicate
    /// subscription and that error is swallowed, so "already listening" is
    /// indistinguishable from success here.
    pub async fn stream_listen(&self, stream_id: &str) -> super::Result<()> {
        match self
            .call_service_method("streamListen", json!({ "streamId": stream_id }))
            .await
        {
            Ok(_) => Ok(()),
            Err(VmError::Upstream { code, .. }) if code == STREAM_ALREADY_SUBSCRIBED => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Close the connection.
    ///
    /// Sends a Close frame, joins the receive loop, and fails everything
    /// still pending with a disconnect error. Safe to call more than once.
    pub async fn disconnect(&self) {
        {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if *state == ConnectionState::Disconnected {
                return;
            }
            *state = ConnectionState::Disconnecting;
        }

        tracing::info!(uri = %self.ws_uri, "Disconnecting from VM service");

        let _ = self.outgoing_tx.send(WriteCommand::Close).await;

        if let Some(mut handle) = self.reader_handle.lock().await.take() {
            // A peer that never answers the close handshake must not stall
            // the caller or the pending requests.
            if tokio::time::timeout(CLOSE_GRACE, &mut handle).await.is_err() {
                handle.abort();
            }
        }

        // The receive loop normally clears these; cover the case where it
        // was already gone.
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = ConnectionState::Disconnected;
        fail_all_pending(&self.pending).await;
    }
}

impl Drop for VmServiceClient {
    fn drop(&mut self) {
        // Best effort: closing the write queue makes the writer task drop
        // the sink, which closes the socket and unwinds the receive loop.
        let _ = self.outgoing_tx.try_send(WriteCommand::Close);
    }
}

/// Fail every pending request with a disconnect error
async fn fail_all_pending(pending: &Arc<Mutex<HashMap<i64, PendingSender>>>) {
    let slots: Vec<PendingSender> = pending.lock().await.drain().map(|(_, tx)| tx).collect();
    if !slots.is_empty() {
        tracing::debug!(count = slots.len(), "failing pending requests on disconnect");
    }
    for slot in slots {
        let _ = slot.send(Err(VmError::Disconnected));
    }
}

/// Invoke the event callback under its own mutex
fn notify_event(callback: &Arc<StdMutex<Option<EventCallback>>>, event: VmEvent) {
    let guard = callback
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(cb) = guard.as_ref() {
        cb(event);
    }
}

/// Build the WebSocket URI, appending the auth token to the path when given
fn build_ws_uri(uri: &str, auth_token: Option<&str>) -> String {
    let base = uri.trim_end_matches('/');
    match auth_token {
        Some(token) if !token.is_empty() => format!("{base}/{token}"),
        _ => base.to_string(),
    }
}
