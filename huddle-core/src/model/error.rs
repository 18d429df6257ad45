use serde::{Deserialize, Serialize};
use std::fmt;

/// Request-scoped failure kinds carried in error replies.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidParams,
    NotFound,
    AlreadyExists,
    WrongSecret,
    NicknameTaken,
    Unauthorized,
    MethodNotFound,
}

impl ErrorKind {
    /// JSON-RPC error code. Only the success/failure split is load-bearing.
    pub fn code(self) -> i32 {
        match self {
            Self::InvalidParams => -32602,
            Self::MethodNotFound => -32601,
            Self::NotFound => -32001,
            Self::AlreadyExists => -32002,
            Self::WrongSecret => -32003,
            Self::NicknameTaken => -32004,
            Self::Unauthorized => -32005,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidParams => "invalid params",
            Self::NotFound => "not found",
            Self::AlreadyExists => "already exists",
            Self::WrongSecret => "wrong secret",
            Self::NicknameTaken => "nickname taken",
            Self::Unauthorized => "unauthorized",
            Self::MethodNotFound => "method not found",
        };
        f.write_str(name)
    }
}
