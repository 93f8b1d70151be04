//! Tests for request correlation, timeouts, and disconnect behavior,
//! against a mock VM service speaking real WebSocket frames.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::vm::{VmError, VmEvent, VmServiceClient};

/// Spawn a mock VM service on an ephemeral port and return its ws:// URI.
///
/// The mock answers `getVM`, `getVersion`, and `echo`; returns an upstream
/// error for `boom`; never answers `slow`; answers `streamListen` once and
/// errors with code 103 on resubscription, emitting one `streamNotify`
/// after the first subscribe.
async fn spawn_mock_vm() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let (mut sink, mut reader) = ws.split();
                let mut subscribed = false;

                while let Some(Ok(msg)) = reader.next().await {
                    let WsMessage::Text(text) = msg else {
                        if matches!(msg, WsMessage::Close(_)) {
                            break;
                        }
                        continue;
                    };

                    let frame: Value = serde_json::from_str(&text).unwrap();
                    let id = frame["id"].clone();
                    let method = frame["method"].as_str().unwrap_or_default().to_string();

                    let reply = match method.as_str() {
                        "getVM" => Some(json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "result": {
                                "type": "VM",
                                "name": "mock-vm",
                                "isolates": [
                                    {"id": "isolates/1", "name": "main"},
                                    {"id": "isolates/2", "name": "worker"}
                                ]
                            }
                        })),
                        "getVersion" => Some(json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "result": {"type": "Version", "major": 4, "minor": 13}
                        })),
                        "echo" => Some(json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "result": frame["params"].clone()
                        })),
                        "boom" => Some(json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": {"code": 100, "message": "feature disabled"}
                        })),
                        "slow" => None,
                        "streamListen" => {
                            if subscribed {
                                Some(json!({
                                    "jsonrpc": "2.0",
                                    "id": id,
                                    "error": {"code": 103, "message": "Stream already subscribed"}
                                }))
                            } else {
                                subscribed = true;
                                let notify = json!({
                                    "jsonrpc": "2.0",
                                    "method": "streamNotify",
                                    "params": {
                                        "streamId": frame["params"]["streamId"].clone(),
                                        "event": {"kind": "IsolateStart"}
                                    }
                                });
                                sink.send(WsMessage::text(
                                    json!({"jsonrpc": "2.0", "id": id, "result": {}}).to_string(),
                                ))
                                .await
                                .unwrap();
                                sink.send(WsMessage::text(notify.to_string())).await.unwrap();
                                None
                            }
                        }
                        _ => Some(json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": {"code": -32601, "message": "Method not found"}
                        })),
                    };

                    if let Some(reply) = reply {
                        if sink.send(WsMessage::text(reply.to_string())).await.is_err() {
                            break;
                        }
                    }
                }
            });
        }
    });

    format!("ws://{addr}/ws")
}

#[tokio::test]
async fn test_connect_caches_main_isolate() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    assert!(client.is_connected());
    assert_eq!(client.get_main_isolate_id().await.unwrap(), "isolates/1");

    client.disconnect().await;
}

#[tokio::test]
async fn test_connect_refused() {
    // Nothing is listening on this port.
    let result = VmServiceClient::connect("ws://127.0.0.1:1/ws", None).await;
    assert!(matches!(result, Err(VmError::ConnectFailed(_))));
}

#[tokio::test]
async fn test_call_round_trip() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    let result = client
        .call_service_method("echo", json!({"x": 42}))
        .await
        .unwrap();
    assert_eq!(result["x"], 42);

    client.disconnect().await;
}

#[tokio::test]
async fn test_upstream_error_preserved() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    let err = client
        .call_service_method("boom", json!({}))
        .await
        .unwrap_err();

    match err {
        VmError::Upstream { code, message } => {
            assert_eq!(code, 100);
            assert_eq!(message, "feature disabled");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }

    client.disconnect().await;
}

#[tokio::test]
async fn test_call_timeout() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    let err = client
        .call_with_timeout("slow", json!({}), Duration::from_millis(100))
        .await
        .unwrap_err();

    assert!(matches!(err, VmError::Timeout { .. }));

    client.disconnect().await;
}

#[tokio::test]
async fn test_concurrent_calls_are_isolated() {
    let uri = spawn_mock_vm().await;
    let client = Arc::new(VmServiceClient::connect(&uri, None).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..16 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            let result = client
                .call_service_method("echo", json!({"n": i}))
                .await
                .unwrap();
            assert_eq!(result["n"], i);
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    client.disconnect().await;
}

#[tokio::test]
async fn test_disconnect_fails_pending() {
    let uri = spawn_mock_vm().await;
    let client = Arc::new(VmServiceClient::connect(&uri, None).await.unwrap());

    let in_flight = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.call_service_method("slow", json!({})).await })
    };

    // Give the call a moment to get onto the wire.
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.disconnect().await;

    let outcome = tokio::time::timeout(Duration::from_millis(200), in_flight)
        .await
        .expect("pending call must settle promptly after disconnect")
        .unwrap();

    assert!(matches!(outcome, Err(VmError::Disconnected)));
}

#[tokio::test]
async fn test_call_after_disconnect() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();
    client.disconnect().await;

    let err = client.call_service_method("getVM", json!({})).await.unwrap_err();
    assert!(matches!(err, VmError::NotConnected));
}

#[tokio::test]
async fn test_stream_listen_idempotent() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    client.stream_listen("Isolate").await.unwrap();
    // The mock errors with code 103 here; the client swallows it.
    client.stream_listen("Isolate").await.unwrap();

    client.disconnect().await;
}

#[tokio::test]
async fn test_stream_events_reach_callback() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    let seen = Arc::new(AtomicUsize::new(0));
    {
        let seen = Arc::clone(&seen);
        client.set_event_callback(Box::new(move |event| {
            if let VmEvent::Stream { stream_id, .. } = event {
                assert_eq!(stream_id, "Isolate");
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    client.stream_listen("Isolate").await.unwrap();

    // The notify arrives asynchronously after the subscribe response.
    for _ in 0..50 {
        if seen.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    client.disconnect().await;
}

#[tokio::test]
async fn test_isolate_listing() {
    let uri = spawn_mock_vm().await;
    let client = VmServiceClient::connect(&uri, None).await.unwrap();

    let ids = client.get_isolate_ids().await.unwrap();
    assert_eq!(ids, vec!["isolates/1", "isolates/2"]);

    client.disconnect().await;
}
