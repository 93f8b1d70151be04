//! Tests for JSON-RPC message classification and round-tripping

use serde_json::{Value, json};

use crate::rpc::{Message, Notification, Request, RequestId, Response, RpcError};

#[test]
fn test_parse_request() {
    let msg = Message::parse(r#"{"jsonrpc":"2.0","id":1,"method":"getVM"}"#).unwrap();

    match msg {
        Message::Request(req) => {
            assert_eq!(req.id, RequestId::Number(1));
            assert_eq!(req.method, "getVM");
            assert!(req.params.is_none());
        }
        other => panic!("expected request, got {other:?}"),
    }
}

#[test]
fn test_parse_request_string_id() {
    let msg = Message::parse(r#"{"jsonrpc":"2.0","id":"abc","method":"ping","params":{}}"#).unwrap();

    match msg {
        Message::Request(req) => {
            assert_eq!(req.id, RequestId::String("abc".to_string()));
            assert_eq!(req.params, Some(json!({})));
        }
        other => panic!("expected request, got {other:?}"),
    }
}

#[test]
fn test_parse_notification() {
    let msg =
        Message::parse(r#"{"jsonrpc":"2.0","method":"streamNotify","params":{"streamId":"Isolate"}}"#)
            .unwrap();

    match msg {
        Message::Notification(n) => {
            assert_eq!(n.method, "streamNotify");
            assert_eq!(n.params.unwrap()["streamId"], "Isolate");
        }
        other => panic!("expected notification, got {other:?}"),
    }
}

#[test]
fn test_null_id_is_notification() {
    let msg = Message::parse(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
    assert!(matches!(msg, Message::Notification(_)));
}

#[test]
fn test_parse_success_response() {
    let msg = Message::parse(r#"{"jsonrpc":"2.0","id":7,"result":{"ok":true}}"#).unwrap();

    match msg {
        Message::Response(resp) => {
            assert_eq!(resp.id, RequestId::Number(7));
            assert_eq!(resp.result.unwrap()["ok"], true);
            assert!(resp.error.is_none());
        }
        other => panic!("expected response, got {other:?}"),
    }
}

#[test]
fn test_parse_error_response() {
    let msg = Message::parse(
        r#"{"jsonrpc":"2.0","id":7,"error":{"code":-32601,"message":"Method not found"}}"#,
    )
    .unwrap();

    match msg {
        Message::Response(resp) => {
            let err = resp.error.unwrap();
            assert_eq!(err.code, -32601);
            assert_eq!(err.message, "Method not found");
        }
        other => panic!("expected response, got {other:?}"),
    }
}

#[test]
fn test_reject_bad_version() {
    let result = Message::parse(r#"{"jsonrpc":"1.0","id":1,"method":"x"}"#);
    assert!(matches!(result, Err(RpcError::InvalidMessage(_))));
}

#[test]
fn test_reject_missing_version() {
    let result = Message::parse(r#"{"id":1,"method":"x"}"#);
    assert!(matches!(result, Err(RpcError::InvalidMessage(_))));
}

#[test]
fn test_reject_scalar_params() {
    let result = Message::parse(r#"{"jsonrpc":"2.0","id":1,"method":"x","params":42}"#);
    assert!(matches!(result, Err(RpcError::InvalidMessage(_))));
}

#[test]
fn test_reject_non_string_method() {
    let result = Message::parse(r#"{"jsonrpc":"2.0","id":1,"method":5}"#);
    assert!(matches!(result, Err(RpcError::InvalidMessage(_))));
}

#[test]
fn test_reject_result_and_error() {
    let result = Message::parse(
        r#"{"jsonrpc":"2.0","id":1,"result":{},"error":{"code":-32000,"message":"x"}}"#,
    );
    assert!(matches!(result, Err(RpcError::InvalidMessage(_))));
}

#[test]
fn test_reject_invalid_json() {
    let result = Message::parse("{not json");
    assert!(matches!(result, Err(RpcError::Parse(_))));
}

#[test]
fn test_round_trip_preserves_content() {
    let inputs = [
        r#"{"jsonrpc":"2.0","id":1,"method":"getVM","params":{"a":1}}"#,
        r#"{"jsonrpc":"2.0","id":"req-1","method":"tap","params":[1,2]}"#,
        r#"{"jsonrpc":"2.0","method":"streamNotify","params":{"streamId":"Extension"}}"#,
        r#"{"jsonrpc":"2.0","id":3,"result":{"type":"VM"}}"#,
        r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32000,"message":"boom"}}"#,
    ];

    for input in inputs {
        let normalized: Value = serde_json::from_str(input).unwrap();
        let round_tripped = Message::parse(input).unwrap().to_value();
        assert_eq!(round_tripped, normalized, "round trip changed {input}");
    }
}

#[test]
fn test_request_serialization() {
    let req = Message::Request(Request {
        id: RequestId::Number(5),
        method: "streamListen".to_string(),
        params: Some(json!({"streamId": "Isolate"})),
    });

    let value = req.to_value();
    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["id"], 5);
    assert_eq!(value["method"], "streamListen");
    assert_eq!(value["params"]["streamId"], "Isolate");
}

#[test]
fn test_notification_serialization_omits_id() {
    let n = Message::Notification(Notification {
        method: "notifications/message".to_string(),
        params: None,
    });

    let value = n.to_value();
    assert!(value.get("id").is_none());
    assert!(value.get("params").is_none());
}

#[test]
fn test_response_helpers() {
    let ok = Response::success(RequestId::String("a".to_string()), json!({"x": 1}));
    assert!(ok.error.is_none());

    let err = Response::error(RequestId::Null, -32700, "Parse error");
    assert!(err.result.is_none());
    assert_eq!(err.error.unwrap().code, -32700);
}

#[test]
fn test_response_id_shape_preserved() {
    // String ids must stay strings through a round trip.
    let msg = Message::parse(r#"{"jsonrpc":"2.0","id":"42","result":{}}"#).unwrap();
    let value = msg.to_value();
    assert_eq!(value["id"], "42");
}
