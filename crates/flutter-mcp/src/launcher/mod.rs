//! Target application launch
//!
//! Spawns `flutter run` for a project and watches its output for the debug
//! service URI. The child is released on every exit path: it is spawned
//! with kill-on-drop, so abandoning the handle tears the process down.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Default time allowed for the target to print its service URI
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Errors that can occur while launching a target
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The flutter process could not be spawned
    #[error("Failed to spawn flutter: {0}")]
    Spawn(#[from] std::io::Error),

    /// The process exited before announcing a service URI
    #[error("Flutter exited before the debug service came up")]
    EarlyExit,

    /// No service URI appeared within the startup timeout
    #[error("Timed out after {0:?} waiting for the debug service URI")]
    StartupTimeout(Duration),
}

/// Launch configuration
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Path to the Flutter project
    pub project_path: PathBuf,
    /// Device id to run on, when not the default
    pub device: Option<String>,
    /// Fixed debug-service port, when not ephemeral
    pub port: Option<u16>,
    /// How long to wait for the service URI
    pub startup_timeout: Duration,
}

impl LaunchConfig {
    /// Create a config for a project path with default settings
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            device: None,
            port: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// A launched target application
#[derive(Debug, Serialize)]
pub struct LaunchedApp {
    /// WebSocket URI of the debug service
    pub uri: String,
    /// Port the service listens on
    pub port: u16,
    /// Child process id
    pub pid: u32,
    /// Project directory name
    pub project_name: String,
    /// Keep the child alive for the session; killed on drop.
    #[serde(skip)]
    child: tokio::process::Child,
}

impl LaunchedApp {
    /// Terminate the launched target
    pub async fn shutdown(mut self) {
        let _ = self.child.kill().await;
    }
}

/// Launch a Flutter project and wait for its debug service.
pub async fn launch(config: LaunchConfig) -> Result<LaunchedApp, LaunchError> {
    let mut command = Command::new("flutter");
    command
        .arg("run")
        .current_dir(&config.project_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    if let Some(device) = &config.device {
        command.args(["-d", device.as_str()]);
    }
    if let Some(port) = config.port {
        command.args(["--vm-service-port", port.to_string().as_str()]);
    }

    tracing::info!(path = %config.project_path.display(), "launching flutter run");

    let mut child = command.spawn()?;
    let stdout = child.stdout.take().ok_or(LaunchError::EarlyExit)?;

    let scan = async {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::debug!(line = %line, "flutter run");
            if let Some(uri) = extract_service_uri(&line) {
                return Some(uri);
            }
        }
        None
    };

    let http_uri = match tokio::time::timeout(config.startup_timeout, scan).await {
        Ok(Some(uri)) => uri,
        Ok(None) => {
            let _ = child.kill().await;
            return Err(LaunchError::EarlyExit);
        }
        Err(_) => {
            let _ = child.kill().await;
            return Err(LaunchError::StartupTimeout(config.startup_timeout));
        }
    };

    let port = extract_port(&http_uri).unwrap_or_default();
    let ws_uri = to_ws_uri(&http_uri);
    let project_name = config
        .project_path
        .file_name()
        .map_or_else(|| "Unknown".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(LaunchedApp {
        uri: ws_uri,
        port,
        pid: child.id().unwrap_or_default(),
        project_name,
        child,
    })
}

/// Pull the service URI out of a `flutter run` output line.
///
/// The announcement looks like:
/// `A Dart VM Service on sdk gphone64 is available at: http://127.0.0.1:9100/tok=/`
fn extract_service_uri(line: &str) -> Option<String> {
    if !line.contains("VM Service") && !line.contains("Observatory") {
        return None;
    }

    let start = line.find("http://")?;
    let uri: String = line[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    Some(uri)
}

/// Port component of an `http://host:port/...` URI
fn extract_port(uri: &str) -> Option<u16> {
    let after_scheme = uri.split("//").nth(1)?;
    let authority = after_scheme.split('/').next()?;
    authority.rsplit(':').next()?.parse().ok()
}

/// Rewrite an announced http URI into the WebSocket endpoint
fn to_ws_uri(http_uri: &str) -> String {
    let ws = http_uri.replacen("http://", "ws://", 1);
    format!("{}ws", ensure_trailing_slash(&ws))
}

fn ensure_trailing_slash(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{uri}/")
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_port, extract_service_uri, to_ws_uri};

    #[test]
    fn test_extract_uri_from_announcement() {
        let line = "A Dart VM Service on macOS is available at: http://127.0.0.1:9100/abcd=/";
        assert_eq!(
            extract_service_uri(line),
            Some("http://127.0.0.1:9100/abcd=/".to_string())
        );
    }

    #[test]
    fn test_extract_uri_ignores_other_lines() {
        assert_eq!(extract_service_uri("Launching lib/main.dart..."), None);
        assert_eq!(extract_service_uri("Flutter run key commands."), None);
    }

    #[test]
    fn test_extract_port() {
        assert_eq!(extract_port("http://127.0.0.1:9100/abcd=/"), Some(9100));
        assert_eq!(extract_port("http://localhost:8181/"), Some(8181));
        assert_eq!(extract_port("http://nohost/"), None);
    }

    #[test]
    fn test_ws_rewrite() {
        assert_eq!(
            to_ws_uri("http://127.0.0.1:9100/abcd=/"),
            "ws://127.0.0.1:9100/abcd=/ws"
        );
        assert_eq!(to_ws_uri("http://127.0.0.1:9100"), "ws://127.0.0.1:9100/ws");
    }
}
