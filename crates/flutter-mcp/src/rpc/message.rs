//! JSON-RPC 2.0 message types and classification

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::error::RpcError;

/// Parse error: the payload was not valid JSON
pub const PARSE_ERROR: i32 = -32700;

/// Invalid request: the payload was not a well-formed request object
pub const INVALID_REQUEST: i32 = -32600;

/// The requested method does not exist
pub const METHOD_NOT_FOUND: i32 = -32601;

/// The method parameters were missing or mistyped
pub const INVALID_PARAMS: i32 = -32602;

/// Internal error during request handling
pub const INTERNAL_ERROR: i32 = -32603;

/// Request identifier.
///
/// JSON-RPC permits string, integer, or null ids. The original shape is
/// preserved through a round trip so clients with strict id typing keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String id
    String(String),
    /// Integer id
    Number(i64),
    /// Null id
    Null,
}

impl RequestId {
    /// Convert to the JSON value used on the wire
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => json!(n),
            Self::Null => Value::Null,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC request carrying an id that expects a response
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Request id
    pub id: RequestId,
    /// Method name
    pub method: String,
    /// Parameters, if any (object or array)
    pub params: Option<Value>,
}

/// A JSON-RPC notification: a method call with no id and no response
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Method name
    pub method: String,
    /// Parameters, if any (object or array)
    pub params: Option<Value>,
}

/// Error payload of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC response, carrying exactly one of `result` or `error`
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Id of the request being answered
    pub id: RequestId,
    /// Successful result
    pub result: Option<Value>,
    /// Error payload
    pub error: Option<ResponseError>,
}

impl Response {
    /// Create a success response
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// A classified JSON-RPC 2.0 message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Method call expecting a response
    Request(Request),
    /// Method call with no response
    Notification(Notification),
    /// Answer to an earlier request
    Response(Response),
}

impl Message {
    /// Parse and classify a JSON-RPC message.
    ///
    /// Classification: `method` present with a non-null `id` is a request;
    /// `method` present without an id (or with `id: null`) is a
    /// notification; no `method` and exactly one of `result`/`error` is a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Parse`] for invalid JSON and
    /// [`RpcError::InvalidMessage`] for JSON that is not a valid 2.0
    /// message.
    pub fn parse(input: &str) -> super::Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Classify an already-parsed JSON value
    pub fn from_value(value: Value) -> super::Result<Self> {
        let Value::Object(obj) = value else {
            return Err(RpcError::InvalidMessage(
                "message must be a JSON object".to_string(),
            ));
        };

        match obj.get("jsonrpc").and_then(Value::as_str) {
            Some("2.0") => {}
            Some(other) => {
                return Err(RpcError::InvalidMessage(format!(
                    "unsupported jsonrpc version: {other}"
                )));
            }
            None => {
                return Err(RpcError::InvalidMessage(
                    "missing jsonrpc version".to_string(),
                ));
            }
        }

        if let Some(params) = obj.get("params") {
            if !params.is_object() && !params.is_array() {
                return Err(RpcError::InvalidMessage(
                    "params must be an object or array".to_string(),
                ));
            }
        }

        let id = match obj.get("id") {
            None => None,
            Some(Value::Null) => Some(RequestId::Null),
            Some(Value::String(s)) => Some(RequestId::String(s.clone())),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Some(RequestId::Number(i)),
                None => {
                    return Err(RpcError::InvalidMessage(
                        "id must be an integer, string, or null".to_string(),
                    ));
                }
            },
            Some(_) => {
                return Err(RpcError::InvalidMessage(
                    "id must be an integer, string, or null".to_string(),
                ));
            }
        };

        if let Some(method) = obj.get("method") {
            let Value::String(method) = method else {
                return Err(RpcError::InvalidMessage(
                    "method must be a string".to_string(),
                ));
            };
            let params = obj.get("params").cloned();

            // An explicit null id carries no reply address, so the call is
            // treated as a notification.
            return Ok(match id {
                Some(id) if id != RequestId::Null => Self::Request(Request {
                    id,
                    method: method.clone(),
                    params,
                }),
                _ => Self::Notification(Notification {
                    method: method.clone(),
                    params,
                }),
            });
        }

        Self::response_from_parts(&obj, id)
    }

    fn response_from_parts(obj: &Map<String, Value>, id: Option<RequestId>) -> super::Result<Self> {
        let result = obj.get("result").cloned();
        let error = obj.get("error").cloned();

        match (result, error) {
            (Some(_), Some(_)) | (None, None) => Err(RpcError::InvalidMessage(
                "response must carry exactly one of result or error".to_string(),
            )),
            (result, error) => {
                let error = error
                    .map(serde_json::from_value::<ResponseError>)
                    .transpose()
                    .map_err(|e| RpcError::InvalidMessage(format!("malformed error object: {e}")))?;

                Ok(Self::Response(Response {
                    id: id.unwrap_or(RequestId::Null),
                    result,
                    error,
                }))
            }
        }
    }

    /// Serialize to the wire JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Request(req) => {
                let mut obj = Map::new();
                obj.insert("jsonrpc".to_string(), json!("2.0"));
                obj.insert("id".to_string(), req.id.to_value());
                obj.insert("method".to_string(), json!(req.method));
                if let Some(params) = &req.params {
                    obj.insert("params".to_string(), params.clone());
                }
                Value::Object(obj)
            }
            Self::Notification(n) => {
                let mut obj = Map::new();
                obj.insert("jsonrpc".to_string(), json!("2.0"));
                obj.insert("method".to_string(), json!(n.method));
                if let Some(params) = &n.params {
                    obj.insert("params".to_string(), params.clone());
                }
                Value::Object(obj)
            }
            Self::Response(resp) => {
                let mut obj = Map::new();
                obj.insert("jsonrpc".to_string(), json!("2.0"));
                obj.insert("id".to_string(), resp.id.to_value());
                if let Some(result) = &resp.result {
                    obj.insert("result".to_string(), result.clone());
                }
                if let Some(error) = &resp.error {
                    obj.insert(
                        "error".to_string(),
                        serde_json::to_value(error).unwrap_or(Value::Null),
                    );
                }
                Value::Object(obj)
            }
        }
    }

    /// Serialize to a wire string
    pub fn serialize(&self) -> String {
        self.to_value().to_string()
    }
}
