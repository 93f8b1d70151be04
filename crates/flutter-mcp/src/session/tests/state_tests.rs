//! Tests for session connect/disconnect lifecycle

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::session::{SessionConfig, SessionError, SessionState};

/// Minimal mock service: answers `getVM` with one isolate, everything else
/// with an empty result.
async fn spawn_mock_vm() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let (mut sink, mut reader) = ws.split();

                while let Some(Ok(WsMessage::Text(text))) = reader.next().await {
                    let frame: Value = serde_json::from_str(&text).unwrap();
                    let result = if frame["method"] == "getVM" {
                        json!({"type": "VM", "isolates": [{"id": "isolates/1"}]})
                    } else {
                        json!({})
                    };
                    let reply = json!({"jsonrpc": "2.0", "id": frame["id"], "result": result});
                    if sink.send(WsMessage::text(reply.to_string())).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    format!("ws://{addr}/ws")
}

#[tokio::test]
async fn test_starts_disconnected() {
    let session = SessionState::new(SessionConfig::default());
    assert!(!session.is_connected().await);
    assert!(matches!(
        session.client().await,
        Err(SessionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_connect_then_disconnect() {
    let uri = spawn_mock_vm().await;
    let session = SessionState::new(SessionConfig::default());

    session.connect(&uri, None).await.unwrap();
    assert!(session.is_connected().await);

    session.disconnect().await.unwrap();
    assert!(!session.is_connected().await);
}

#[tokio::test]
async fn test_disconnect_without_session() {
    let session = SessionState::new(SessionConfig::default());
    assert!(matches!(
        session.disconnect().await,
        Err(SessionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_reconnect_replaces_session() {
    let uri = spawn_mock_vm().await;
    let session = SessionState::new(SessionConfig::default());

    session.connect(&uri, None).await.unwrap();
    let first = session.client().await.unwrap();

    session.connect(&uri, None).await.unwrap();
    let second = session.client().await.unwrap();

    assert!(!first.is_connected(), "old session must be closed");
    assert!(second.is_connected());
}

#[tokio::test]
async fn test_connect_failure_leaves_disconnected() {
    let session = SessionState::new(SessionConfig::default());
    assert!(session.connect("ws://127.0.0.1:1/ws", None).await.is_err());
    assert!(!session.is_connected().await);
}
