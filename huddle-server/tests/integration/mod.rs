pub mod room_tests;

use tracing::Level;

use huddle_server::{RoomRegistry, SignalingDispatcher};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A dispatcher over a fresh registry, as one server process would build it.
pub fn create_test_dispatcher() -> SignalingDispatcher {
    SignalingDispatcher::new(RoomRegistry::new())
}
