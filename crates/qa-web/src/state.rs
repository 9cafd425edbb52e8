//! Application state.

use qa_core::auth::TokenService;
use qa_core::Envelope;
use qa_db::DbPool;
use qa_realtime::{Broadcaster, ConnectionRegistry};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub tokens: TokenService,
    pub broadcaster: Broadcaster,
}

impl AppState {
    /// Build state around a fresh, empty connection registry.
    pub fn new(db: Arc<DbPool>, tokens: TokenService) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            db,
            tokens,
            broadcaster: Broadcaster::new(registry),
        }
    }

    /// The process-wide registry of open WebSocket connections.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        self.broadcaster.registry()
    }

    /// Push an event to every WebSocket client. Never fails the caller.
    pub async fn broadcast(&self, envelope: Envelope) -> usize {
        self.broadcaster.broadcast(&envelope).await
    }
}
