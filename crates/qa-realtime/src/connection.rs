//! A single push connection and the sink it writes to.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Why a message could not be handed to a connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,

    #[error("send timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound half of a transport session.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Hand one serialized message to the transport.
    async fn send_text(&self, text: Arc<str>) -> Result<(), DeliveryError>;
}

/// Handle to one open push session.
///
/// Clones share identity and liveness. Once closed a connection stays closed;
/// a reconnecting client gets a fresh `Connection`.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    id: ConnectionId,
    open: AtomicBool,
    sink: Box<dyn MessageSink>,
}

impl Connection {
    pub fn new(sink: impl MessageSink + 'static) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                id: ConnectionId::next(),
                open: AtomicBool::new(true),
                sink: Box::new(sink),
            }),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    /// Mark the connection closed. Returns `true` only for the call that closed it.
    pub(crate) fn close(&self) -> bool {
        self.inner.open.swap(false, Ordering::AcqRel)
    }

    /// Send one message. Fails immediately on a closed connection.
    pub async fn send(&self, text: Arc<str>) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }
        self.inner.sink.send_text(text).await
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Connection {}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id())
            .field("open", &self.is_open())
            .finish()
    }
}
