//! Fan-out of event envelopes to registered connections.

use qa_core::Envelope;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::connection::{Connection, ConnectionId};
use crate::registry::ConnectionRegistry;

/// Delivers envelopes to the connections held by a [`ConnectionRegistry`].
///
/// Delivery is best effort: a failed send prunes that connection and never
/// fails the caller. Each call works on a snapshot, so connections joining or
/// leaving mid-call neither corrupt the pass nor receive the message twice.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Send to every registered connection. Returns the number of successful deliveries.
    pub async fn broadcast(&self, envelope: &Envelope) -> usize {
        let targets = self.registry.snapshot_all();
        let attempted = targets.len();
        let delivered = self.deliver(envelope, targets, None).await;

        info!(
            kind = envelope.kind().as_str(),
            delivered,
            pruned = attempted - delivered,
            "Broadcasted message"
        );
        delivered
    }

    /// Send to the connections registered under `user_id`.
    pub async fn send_to_user(&self, user_id: &str, envelope: &Envelope) -> usize {
        let targets = self.registry.snapshot_for_user(user_id);
        if targets.is_empty() {
            debug!(user_id, "No open connections for user");
            return 0;
        }

        let delivered = self.deliver(envelope, targets, Some(user_id)).await;
        debug!(kind = envelope.kind().as_str(), user_id, delivered, "Sent message to user");
        delivered
    }

    /// Send to admin users.
    ///
    /// Connections carry no role, so this reaches every connection; clients
    /// filter admin-only events themselves.
    pub async fn send_to_admins(&self, envelope: &Envelope) -> usize {
        self.broadcast(envelope).await
    }

    async fn deliver(
        &self,
        envelope: &Envelope,
        targets: Vec<Connection>,
        user_id: Option<&str>,
    ) -> usize {
        if targets.is_empty() {
            return 0;
        }

        let payload: Arc<str> = match envelope.to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                error!(kind = envelope.kind().as_str(), error = %e, "Failed to serialize envelope");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut failed: Vec<ConnectionId> = Vec::new();

        for conn in &targets {
            match conn.send(payload.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(connection_id = %conn.id(), user_id, error = %e, "Error sending message");
                    failed.push(conn.id());
                }
            }
        }

        for id in failed {
            if self.registry.deregister(id, user_id) {
                debug!(connection_id = %id, "Pruned dead connection");
            }
        }

        delivered
    }
}
