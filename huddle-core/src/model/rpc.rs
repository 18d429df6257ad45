use crate::model::error::ErrorKind;
use crate::model::signaling::RoomEvent;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The literal `"2.0"` version marker of JSON-RPC frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let version = String::deserialize(deserializer)?;
        if version == "2.0" {
            Ok(Self)
        } else {
            Err(de::Error::custom(format!(
                "unsupported jsonrpc version {version:?}"
            )))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Str(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

/// Inbound request frame. `params` stays untyped until the method is known.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<JsonRpcVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: impl Into<RequestId>, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: Some(JsonRpcVersion),
            id: Some(id.into()),
            method: method.to_string(),
            params,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorData {
    pub kind: ErrorKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: ErrorData,
}

impl RpcError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code(),
            message: message.into(),
            data: ErrorData { kind },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.data.kind
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RpcResponse {
    pub jsonrpc: JsonRpcVersion,
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Server-pushed notification as it appears on the wire.
#[derive(Debug, Serialize)]
pub struct Notification<'a> {
    pub jsonrpc: JsonRpcVersion,
    #[serde(flatten)]
    pub event: &'a RoomEvent,
}

/// Everything the server enqueues towards one client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Response(RpcResponse),
    Event(RoomEvent),
}

impl ServerFrame {
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            Self::Response(response) => serde_json::to_string(response),
            Self::Event(event) => serde_json::to_string(&Notification {
                jsonrpc: JsonRpcVersion,
                event,
            }),
        }
    }
}
