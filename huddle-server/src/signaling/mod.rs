mod connection;
mod dispatcher;
mod outbox;
mod session;
mod ws_handler;

pub use connection::*;
pub use dispatcher::*;
pub use outbox::*;
pub use session::*;
pub use ws_handler::*;
