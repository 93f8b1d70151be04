//! Shared session state

use std::sync::Arc;

use tokio::sync::Mutex;

use super::config::SessionConfig;
use super::error::SessionError;
use crate::launcher::LaunchedApp;
use crate::vm::{VmEvent, VmServiceClient};

/// Connection state shared by every tool.
///
/// The client slot sits behind its own mutex, held only long enough to
/// clone or swap the `Arc`; tool calls themselves run against the cloned
/// client, so a disconnect issued concurrently fails them promptly instead
/// of waiting for them.
pub struct SessionState {
    config: SessionConfig,
    client: Mutex<Option<Arc<VmServiceClient>>>,
    launched: Mutex<Option<LaunchedApp>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Create a disconnected session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
            launched: Mutex::new(None),
        }
    }

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Establish the debug-service session.
    ///
    /// An existing session is closed first; connecting is never stacked.
    pub async fn connect(&self, uri: &str, auth_token: Option<&str>) -> super::Result<()> {
        if let Some(old) = self.client.lock().await.take() {
            old.disconnect().await;
        }

        let client =
            VmServiceClient::connect_with_timeout(uri, auth_token, self.config.call_timeout)
                .await?;

        client.set_event_callback(Box::new(|event| match event {
            VmEvent::Stream { stream_id, .. } => {
                tracing::debug!(stream = %stream_id, "VM stream event");
            }
            VmEvent::Closed => tracing::info!("VM service connection closed"),
        }));

        // Isolate lifecycle events are informational; a service that
        // refuses the subscription is still usable.
        if let Err(e) = client.stream_listen("Isolate").await {
            tracing::debug!(error = %e, "Isolate stream subscription failed");
        }

        *self.client.lock().await = Some(Arc::new(client));
        Ok(())
    }

    /// Close the session.
    ///
    /// Fails every request still in flight with a disconnect error.
    pub async fn disconnect(&self) -> super::Result<()> {
        let client = self
            .client
            .lock()
            .await
            .take()
            .ok_or(SessionError::NotConnected)?;

        client.disconnect().await;
        Ok(())
    }

    /// The connected client.
    ///
    /// A client whose socket has already dropped is reaped here, so the
    /// caller sees "not connected" rather than a stale handle.
    pub async fn client(&self) -> super::Result<Arc<VmServiceClient>> {
        let mut slot = self.client.lock().await;

        match slot.as_ref() {
            Some(client) if client.is_connected() => Ok(Arc::clone(client)),
            Some(_) => {
                *slot = None;
                Err(SessionError::NotConnected)
            }
            None => Err(SessionError::NotConnected),
        }
    }

    /// Whether a live session exists
    pub async fn is_connected(&self) -> bool {
        self.client().await.is_ok()
    }

    /// Remember a target we launched, shutting down any previous one
    pub async fn store_launched(&self, app: LaunchedApp) {
        if let Some(previous) = self.launched.lock().await.replace(app) {
            previous.shutdown().await;
        }
    }

    /// Shut down the launched target, if any
    pub async fn shutdown_launched(&self) {
        if let Some(app) = self.launched.lock().await.take() {
            app.shutdown().await;
        }
    }
}
