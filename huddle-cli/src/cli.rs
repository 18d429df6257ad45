use clap::Parser;
use clap::builder::TypedValueParser;
use huddle_server::{
    DEFAULT_BIND_ADDRESS, DEFAULT_MAX_FRAME_BYTES, DEFAULT_QUEUE_CAPACITY, DEFAULT_WS_PATH,
    ServerConfig,
};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Signaling relay for multi-party audio/video rooms")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "HUDDLE_BIND", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: SocketAddr,

    /// Path of the WebSocket endpoint.
    #[arg(long, env = "HUDDLE_WS_PATH", default_value = DEFAULT_WS_PATH, value_parser = parse_ws_path)]
    pub ws_path: String,

    /// Outbound frames buffered per connection before notifications are dropped.
    #[arg(long, env = "HUDDLE_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY, value_parser = clap::value_parser!(u32).range(1..).map(|v| v as usize))]
    pub queue_capacity: usize,

    /// Largest accepted inbound frame, in bytes.
    #[arg(long, env = "HUDDLE_MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind,
            ws_path: self.ws_path,
            queue_capacity: self.queue_capacity,
            max_frame_bytes: self.max_frame_bytes,
        }
    }
}

fn parse_ws_path(s: &str) -> Result<String, String> {
    if s.starts_with('/') && s.len() > 1 {
        Ok(s.to_string())
    } else {
        Err(format!("websocket path must start with '/' and name a route, got {s:?}"))
    }
}
