//! Real-time fan-out for dashboard clients.
//!
//! [`ConnectionRegistry`] tracks every open push connection (and which user,
//! if any, it belongs to). [`Broadcaster`] serializes an event envelope once
//! and delivers it to a snapshot of those connections, pruning any connection
//! whose send fails.

pub mod connection;
pub mod dispatcher;
pub mod registry;
pub mod sink;

pub use connection::{Connection, ConnectionId, DeliveryError, MessageSink};
pub use dispatcher::Broadcaster;
pub use registry::ConnectionRegistry;
pub use sink::{ChannelSink, DEFAULT_QUEUE_CAPACITY};
