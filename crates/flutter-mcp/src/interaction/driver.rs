//! Gesture and text-entry execution

use std::future::Future;
use std::time::Duration;

use serde_json::{Value, json};

use super::error::InteractionError;
use crate::inspector::{WidgetBounds, WidgetNode};
use crate::vm::VmServiceClient;

/// Poll interval for [`wait_for`]
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drives gestures and text entry on a connected target.
///
/// Taps, scrolls, and long presses go through the pointer-injection handler
/// embedded in the target (reached over the driver's `request_data`
/// channel); text entry and idle waits use the driver extension directly.
pub struct InteractionDriver<'a> {
    client: &'a VmServiceClient,
}

impl<'a> InteractionDriver<'a> {
    /// Create a driver over a connected client
    pub fn new(client: &'a VmServiceClient) -> Self {
        Self { client }
    }

    /// Tap at logical coordinates
    pub async fn tap_at(&self, x: f64, y: f64) -> super::Result<Value> {
        self.send_injection(&tap_payload(x, y)).await
    }

    /// Tap the center of a bounding box
    pub async fn tap_bounds(&self, bounds: &WidgetBounds) -> super::Result<Value> {
        let (x, y) = bounds.center();
        self.tap_at(x, y).await
    }

    /// Tap a widget, aiming at the center of its bounds
    pub async fn tap_node(&self, node: &WidgetNode) -> super::Result<Value> {
        let bounds = node
            .bounds
            .filter(WidgetBounds::is_valid)
            .ok_or_else(|| InteractionError::NoGeometry(node.id.clone()))?;
        self.tap_bounds(&bounds).await
    }

    /// Scroll from a start point by an offset over a duration
    pub async fn scroll(
        &self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        duration: Duration,
    ) -> super::Result<Value> {
        self.send_injection(&scroll_payload(x, y, dx, dy, duration))
            .await
    }

    /// Press and hold at logical coordinates
    pub async fn long_press(&self, x: f64, y: f64, duration: Duration) -> super::Result<Value> {
        self.send_injection(&long_press_payload(x, y, duration))
            .await
    }

    /// Enter text into the currently focused input field
    pub async fn enter_text(&self, text: &str) -> super::Result<Value> {
        self.drive(json!({ "command": "enter_text", "text": text }))
            .await
    }

    /// Wait until the target has no transient callbacks scheduled
    pub async fn wait_until_idle(&self, timeout: Duration) -> super::Result<Value> {
        #[allow(clippy::cast_possible_truncation)]
        let millis = timeout.as_millis() as u64;
        self.drive(json!({
            "command": "waitUntilNoTransientCallbacks",
            "timeout": millis,
        }))
        .await
    }

    /// Post a custom command to the pointer-injection handler and check
    /// its `{success, …}` reply.
    async fn send_injection(&self, payload: &Value) -> super::Result<Value> {
        let reply = self
            .drive(json!({
                "command": "request_data",
                "message": payload.to_string(),
            }))
            .await?;

        let message = reply
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| InteractionError::MalformedReply(reply.to_string()))?;

        let parsed: Value = serde_json::from_str(message)
            .map_err(|e| InteractionError::MalformedReply(e.to_string()))?;

        if parsed.get("success").and_then(Value::as_bool) == Some(true) {
            Ok(parsed)
        } else {
            let error = parsed
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("handler reported failure");
            Err(InteractionError::Injection(error.to_string()))
        }
    }

    /// Call the driver extension with a command object
    async fn drive(&self, mut command: Value) -> super::Result<Value> {
        let isolate_id = self.client.get_main_isolate_id().await?;
        command["isolateId"] = json!(isolate_id);

        let reply = self
            .client
            .call_service_method("ext.flutter.driver", command)
            .await?;

        if reply.get("isError").and_then(Value::as_bool) == Some(true) {
            let message = reply
                .get("response")
                .map_or_else(|| reply.to_string(), Value::to_string);
            return Err(InteractionError::Driver(message));
        }

        Ok(reply.get("response").cloned().unwrap_or(reply))
    }
}

/// Poll a predicate at ~100 ms intervals.
///
/// Returns true as soon as the predicate holds, false once the timeout
/// elapses without it ever holding.
pub async fn wait_for<F, Fut>(mut predicate: F, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if predicate().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - tokio::time::Instant::now())).await;
    }
}

/// `tapAt` wire payload for the injection handler
pub(super) fn tap_payload(x: f64, y: f64) -> Value {
    json!({ "command": "tapAt", "x": x, "y": y })
}

/// `scrollAt` wire payload for the injection handler
pub(super) fn scroll_payload(x: f64, y: f64, dx: f64, dy: f64, duration: Duration) -> Value {
    #[allow(clippy::cast_possible_truncation)]
    let millis = duration.as_millis() as u64;
    json!({
        "command": "scrollAt",
        "x": x,
        "y": y,
        "dx": dx,
        "dy": dy,
        "duration": millis,
    })
}

/// `longPressAt` wire payload for the injection handler
pub(super) fn long_press_payload(x: f64, y: f64, duration: Duration) -> Value {
    #[allow(clippy::cast_possible_truncation)]
    let millis = duration.as_millis() as u64;
    json!({ "command": "longPressAt", "x": x, "y": y, "duration": millis })
}
