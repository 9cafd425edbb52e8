//! Registry of open push connections.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::connection::{Connection, ConnectionId};

/// Tracks every open connection plus an index from user id to that user's connections.
///
/// Both structures sit behind one lock, so a snapshot never sees a connection
/// half-registered or half-removed. Snapshots are ordered by connection id,
/// which follows the order connections were created, not registered.
#[derive(Default)]
pub struct ConnectionRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    all: BTreeMap<ConnectionId, Entry>,
    by_user: HashMap<String, Vec<Connection>>,
}

struct Entry {
    conn: Connection,
    user_id: Option<String>,
}

impl RegistryState {
    fn unlink_user(&mut self, user_id: &str, id: ConnectionId) {
        if let Some(conns) = self.by_user.get_mut(user_id) {
            conns.retain(|c| c.id() != id);
            if conns.is_empty() {
                self.by_user.remove(user_id);
            }
        }
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open connection, optionally bound to `user_id`.
    ///
    /// Refuses (returns `false`) a connection that is already registered or
    /// has been closed.
    pub fn register(&self, conn: Connection, user_id: Option<&str>) -> bool {
        let id = conn.id();
        let mut state = self.state.lock();

        if !conn.is_open() {
            warn!(connection_id = %id, "Refusing to register a closed connection");
            return false;
        }
        if state.all.contains_key(&id) {
            warn!(connection_id = %id, "Connection already registered");
            return false;
        }

        if let Some(user_id) = user_id {
            state
                .by_user
                .entry(user_id.to_string())
                .or_default()
                .push(conn.clone());
        }
        state.all.insert(
            id,
            Entry {
                conn,
                user_id: user_id.map(str::to_string),
            },
        );

        debug!(connection_id = %id, user_id, total = state.all.len(), "Connection registered");
        true
    }

    /// Remove a connection and close it.
    ///
    /// The connection is unlinked from the user it was registered under and
    /// from `user_id` if one is named. Removing an absent connection is a
    /// no-op; only the call that actually removed it returns `true`.
    pub fn deregister(&self, id: ConnectionId, user_id: Option<&str>) -> bool {
        let mut state = self.state.lock();

        let Some(entry) = state.all.remove(&id) else {
            return false;
        };

        if let Some(bound) = entry.user_id.as_deref() {
            state.unlink_user(bound, id);
        }
        if let Some(named) = user_id {
            if entry.user_id.as_deref() != Some(named) {
                state.unlink_user(named, id);
            }
        }
        entry.conn.close();

        debug!(connection_id = %id, total = state.all.len(), "Connection deregistered");
        true
    }

    /// Point-in-time copy of every open connection, ordered by id.
    pub fn snapshot_all(&self) -> Vec<Connection> {
        let state = self.state.lock();
        state.all.values().map(|e| e.conn.clone()).collect()
    }

    /// Point-in-time copy of one user's connections. Empty if the user has none.
    pub fn snapshot_for_user(&self, user_id: &str) -> Vec<Connection> {
        let state = self.state.lock();
        state.by_user.get(user_id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().all.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.state.lock().all.contains_key(&id)
    }

    /// Number of users with at least one open connection.
    pub fn user_count(&self) -> usize {
        self.state.lock().by_user.len()
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.state.lock().by_user.contains_key(user_id)
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let state = self.state.lock();
        for (user, conns) in &state.by_user {
            assert!(!conns.is_empty(), "empty entry left for {user}");
            for conn in conns {
                let entry = state
                    .all
                    .get(&conn.id())
                    .expect("user index points at unregistered connection");
                assert_eq!(entry.user_id.as_deref(), Some(user.as_str()));
            }
            let mut ids: Vec<_> = conns.iter().map(Connection::id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), conns.len(), "duplicate in user index for {user}");
        }
        for (id, entry) in &state.all {
            assert_eq!(*id, entry.conn.id());
            assert!(entry.conn.is_open());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{DeliveryError, MessageSink};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NullSink;

    #[async_trait]
    impl MessageSink for NullSink {
        async fn send_text(&self, _text: Arc<str>) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    fn conn() -> Connection {
        Connection::new(NullSink)
    }

    fn ids(conns: &[Connection]) -> Vec<ConnectionId> {
        conns.iter().map(Connection::id).collect()
    }

    #[test]
    fn test_register_and_snapshot_order() {
        let registry = ConnectionRegistry::new();
        let (a, b, c) = (conn(), conn(), conn());
        assert!(registry.register(a.clone(), None));
        assert!(registry.register(b.clone(), Some("alice")));
        assert!(registry.register(c.clone(), None));

        assert_eq!(ids(&registry.snapshot_all()), vec![a.id(), b.id(), c.id()]);
        assert_eq!(ids(&registry.snapshot_for_user("alice")), vec![b.id()]);
        assert!(registry.snapshot_for_user("bob").is_empty());
    }

    #[test]
    fn test_snapshot_follows_creation_order() {
        let registry = ConnectionRegistry::new();
        let (older, newer) = (conn(), conn());
        assert!(registry.register(newer.clone(), None));
        assert!(registry.register(older.clone(), None));

        assert_eq!(ids(&registry.snapshot_all()), vec![older.id(), newer.id()]);
    }

    #[test]
    fn test_duplicate_registration_refused() {
        let registry = ConnectionRegistry::new();
        let a = conn();
        assert!(registry.register(a.clone(), Some("alice")));
        assert!(!registry.register(a.clone(), Some("alice")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot_for_user("alice").len(), 1);
    }

    #[test]
    fn test_deregister_absent_is_noop() {
        let registry = ConnectionRegistry::new();
        let a = conn();
        assert!(!registry.deregister(a.id(), None));
        assert!(!registry.deregister(a.id(), Some("alice")));
        assert!(a.is_open());
    }

    #[test]
    fn test_deregister_twice_reports_once() {
        let registry = ConnectionRegistry::new();
        let a = conn();
        registry.register(a.clone(), None);
        assert!(registry.deregister(a.id(), None));
        assert!(!registry.deregister(a.id(), None));
        assert!(!a.is_open());
    }

    #[test]
    fn test_empty_user_entry_removed() {
        let registry = ConnectionRegistry::new();
        let c1 = conn();
        registry.register(c1.clone(), Some("alice"));
        assert!(registry.has_user("alice"));

        registry.deregister(c1.id(), Some("alice"));
        assert!(!registry.has_user("alice"));
        assert_eq!(registry.user_count(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_deregister_without_user_cleans_user_index() {
        let registry = ConnectionRegistry::new();
        let tab1 = conn();
        let tab2 = conn();
        registry.register(tab1.clone(), Some("alice"));
        registry.register(tab2.clone(), Some("alice"));

        registry.deregister(tab1.id(), None);
        assert_eq!(ids(&registry.snapshot_for_user("alice")), vec![tab2.id()]);
        registry.assert_consistent();
    }

    #[test]
    fn test_closed_connection_cannot_return() {
        let registry = ConnectionRegistry::new();
        let a = conn();
        registry.register(a.clone(), None);
        registry.deregister(a.id(), None);

        assert!(!registry.register(a.clone(), None));
        assert!(!registry.contains(a.id()));
    }

    #[test]
    fn test_snapshot_is_stable_without_mutation() {
        let registry = ConnectionRegistry::new();
        for user in ["alice", "bob", "alice"] {
            registry.register(conn(), Some(user));
        }
        registry.register(conn(), None);

        assert_eq!(ids(&registry.snapshot_all()), ids(&registry.snapshot_all()));
        assert_eq!(
            ids(&registry.snapshot_for_user("alice")),
            ids(&registry.snapshot_for_user("alice"))
        );
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let registry = ConnectionRegistry::new();
        let a = conn();
        registry.register(a.clone(), None);

        let snapshot = registry.snapshot_all();
        registry.deregister(a.id(), None);
        registry.register(conn(), None);

        assert_eq!(ids(&snapshot), vec![a.id()]);
    }

    #[test]
    fn test_invariants_hold_over_mixed_operations() {
        let registry = ConnectionRegistry::new();
        let users = ["alice", "bob", "carol"];
        let mut live: Vec<Connection> = Vec::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;

            match seed % 5 {
                0 | 1 => {
                    let c = conn();
                    let user = match seed % 4 {
                        3 => None,
                        n => Some(users[n as usize]),
                    };
                    assert!(registry.register(c.clone(), user));
                    live.push(c);
                }
                2 if !live.is_empty() => {
                    let victim = live.remove((seed as usize / 5) % live.len());
                    assert!(registry.deregister(victim.id(), None));
                }
                3 if !live.is_empty() => {
                    let c = live[(seed as usize / 5) % live.len()].clone();
                    assert!(!registry.register(c, Some("mallory")));
                }
                _ => {
                    let c = conn();
                    assert!(!registry.deregister(c.id(), Some("alice")));
                }
            }

            registry.assert_consistent();
            assert_eq!(registry.len(), live.len());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_and_deregister() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let user = format!("user-{}", worker % 3);
                let mut kept = Vec::new();
                for i in 0..100 {
                    let c = conn();
                    assert!(registry.register(c.clone(), Some(&user)));

                    // Only this worker removes `c`, so every snapshot taken now must hold it.
                    assert!(registry.snapshot_all().contains(&c));
                    assert!(registry.snapshot_for_user(&user).contains(&c));

                    if i % 2 == 0 {
                        assert!(registry.deregister(c.id(), Some(&user)));
                        assert!(!registry.snapshot_all().contains(&c));
                    } else {
                        kept.push(c.id());
                    }
                    tokio::task::yield_now().await;
                }
                kept
            }));
        }

        let mut expected = 0;
        for handle in handles {
            let kept = handle.await.unwrap();
            for id in &kept {
                assert!(registry.contains(*id));
            }
            expected += kept.len();
        }

        assert_eq!(registry.len(), expected);
        registry.assert_consistent();
    }
}
