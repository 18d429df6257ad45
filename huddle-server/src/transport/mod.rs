mod connection_channel;
mod ws_channel;

pub use connection_channel::*;
pub use ws_channel::*;
