pub mod hub;
pub mod session;

pub use hub::{Deliver, WsRegistry};
pub use session::WsSession;
