//! Shared chat room: presence tracking and message fan-out over WebSockets.

pub mod hub;
pub mod messages;
pub mod session;

pub use hub::{ChatConnection, ChatHub, ConnectionId};
pub use messages::{ChatMessage, ClientEvent, ServerEvent};
