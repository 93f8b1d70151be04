//! Flutter instance discovery
//!
//! Probes a local port range for running debug services. A port counts as
//! an instance when it answers HTTP, completes a WebSocket handshake on
//! `/ws`, and responds to `getVersion`. Probe failures and timeouts are
//! silently treated as "not present".

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::vm::VmServiceClient;

/// Default first port of the probe range
pub const DEFAULT_PORT_START: u16 = 8180;

/// Default last port of the probe range
pub const DEFAULT_PORT_END: u16 = 8189;

/// Default per-port probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

/// A running Flutter instance detected on the local machine
#[derive(Debug, Clone, Serialize)]
pub struct FlutterInstance {
    /// WebSocket URI of the debug service
    pub uri: String,
    /// Port the service listens on
    pub port: u16,
    /// Best-effort project name, `"Unknown"` when not derivable
    pub project_name: String,
    /// Best-effort device description
    pub device: String,
    /// VM version string
    pub vm_version: String,
    /// Wall-clock time of detection
    pub discovered_at: DateTime<Utc>,
}

/// Probe `[start, end]` and return the instances found, ordered by port.
///
/// Ports are probed concurrently; an empty result is not an error.
pub async fn discover_instances(
    start: u16,
    end: u16,
    per_port_timeout: Duration,
) -> Vec<FlutterInstance> {
    if start > end {
        return Vec::new();
    }

    tracing::debug!(start, end, "probing for debug services");

    let probes = (start..=end).map(|port| probe_port(port, per_port_timeout));
    join_all(probes).await.into_iter().flatten().collect()
}

/// Probe one port; `None` unless a debug service fully answers in time
async fn probe_port(port: u16, per_port_timeout: Duration) -> Option<FlutterInstance> {
    tokio::time::timeout(per_port_timeout, identify(port))
        .await
        .ok()
        .flatten()
}

async fn identify(port: u16) -> Option<FlutterInstance> {
    // Cheap HTTP check first; the VM service serves a landing page on the
    // same port as the WebSocket endpoint.
    let http = reqwest::Client::builder().build().ok()?;
    http.get(format!("http://127.0.0.1:{port}/"))
        .send()
        .await
        .ok()?;

    let ws_uri = format!("ws://127.0.0.1:{port}/ws");
    let client = VmServiceClient::connect(&ws_uri, None).await.ok()?;

    let version = client.get_version().await.ok()?;
    let vm = client.get_vm().await.unwrap_or(Value::Null);
    client.disconnect().await;

    Some(FlutterInstance {
        uri: ws_uri,
        port,
        project_name: extract_project_name(&vm),
        device: extract_device(&vm),
        vm_version: format_version(&version),
        discovered_at: Utc::now(),
    })
}

/// Best-effort project name from the VM description.
///
/// Tries the VM name, then the first isolate's name, then the stem of the
/// first isolate's root library URI. May legitimately return `"Unknown"`.
fn extract_project_name(vm: &Value) -> String {
    if let Some(name) = vm.get("name").and_then(Value::as_str) {
        if !name.is_empty() && name != "vm" {
            return name.to_string();
        }
    }

    let first_isolate = vm
        .get("isolates")
        .and_then(Value::as_array)
        .and_then(|isolates| isolates.first());

    if let Some(isolate) = first_isolate {
        if let Some(name) = isolate.get("name").and_then(Value::as_str) {
            // Isolate names look like "main" or "package:counter/main.dart:main()".
            if let Some(package) = name.strip_prefix("package:").and_then(|n| n.split('/').next()) {
                return package.to_string();
            }
        }
        if let Some(root_lib) = isolate
            .get("rootLib")
            .and_then(|lib| lib.get("uri"))
            .and_then(Value::as_str)
        {
            if let Some(package) = root_lib.strip_prefix("package:").and_then(|n| n.split('/').next())
            {
                return package.to_string();
            }
        }
    }

    "Unknown".to_string()
}

/// Best-effort device description from the VM description
fn extract_device(vm: &Value) -> String {
    vm.get("operatingSystem")
        .or_else(|| vm.get("hostCPU"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// Render a `getVersion` reply as `major.minor`
fn format_version(version: &Value) -> String {
    match (
        version.get("major").and_then(Value::as_i64),
        version.get("minor").and_then(Value::as_i64),
    ) {
        (Some(major), Some(minor)) => format!("{major}.{minor}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{extract_device, extract_project_name, format_version};

    #[test]
    fn test_project_name_from_vm_name() {
        let vm = json!({"name": "counter_app", "isolates": []});
        assert_eq!(extract_project_name(&vm), "counter_app");
    }

    #[test]
    fn test_project_name_from_isolate_package() {
        let vm = json!({
            "name": "vm",
            "isolates": [{"name": "package:counter/main.dart:main()"}]
        });
        assert_eq!(extract_project_name(&vm), "counter");
    }

    #[test]
    fn test_project_name_from_root_lib() {
        let vm = json!({
            "name": "vm",
            "isolates": [{"name": "main", "rootLib": {"uri": "package:shop/main.dart"}}]
        });
        assert_eq!(extract_project_name(&vm), "shop");
    }

    #[test]
    fn test_project_name_fallback() {
        assert_eq!(extract_project_name(&json!({})), "Unknown");
        assert_eq!(extract_project_name(&json!({"name": "vm"})), "Unknown");
    }

    #[test]
    fn test_device_fallback() {
        assert_eq!(extract_device(&json!({"operatingSystem": "android"})), "android");
        assert_eq!(extract_device(&json!({})), "Unknown");
    }

    #[test]
    fn test_version_rendering() {
        assert_eq!(format_version(&json!({"major": 4, "minor": 13})), "4.13");
        assert_eq!(format_version(&json!({})), "");
    }

    #[tokio::test]
    async fn test_empty_range() {
        let found = super::discover_instances(9000, 8000, super::DEFAULT_PROBE_TIMEOUT).await;
        assert!(found.is_empty());
    }
}
