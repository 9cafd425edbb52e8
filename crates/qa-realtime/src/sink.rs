//! Channel-backed sink feeding a per-connection writer task.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::connection::{DeliveryError, MessageSink};

/// Messages a connection may have queued before it counts as stalled.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Pushes messages into a bounded queue drained by the socket writer.
///
/// Sending never waits on the peer. A full queue means the writer is stuck on
/// a client that stopped reading, and is reported as [`DeliveryError::Timeout`].
/// A dropped receiver means the writer has stopped, reported as
/// [`DeliveryError::Closed`]. Either way the dispatcher prunes the connection.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Arc<str>>,
}

impl ChannelSink {
    /// Create a sink with the default queue capacity and the receiver its writer task drains.
    pub fn channel() -> (Self, mpsc::Receiver<Arc<str>>) {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_text(&self, text: Arc<str>) -> Result<(), DeliveryError> {
        self.tx.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Timeout,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}
