mod chat;
mod error;
mod peer;
mod room;
mod rpc;
mod signaling;

pub use chat::ChatEntry;
pub use error::ErrorKind;
pub use peer::PeerId;
pub use room::{MediaKind, RoomId, RoomSettings};
pub use rpc::{
    JsonRpcVersion, Notification, RequestId, RpcError, RpcRequest, RpcResponse, ServerFrame,
};
pub use signaling::*;
