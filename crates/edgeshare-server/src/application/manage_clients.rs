//! ClientRegistry: connection state per secondary screen.
//!
//! The registry remembers every secondary that has connected during this
//! session, keyed by screen name.  A secondary that disconnects (or times out
//! on an `enter`) stays in the registry as `Disconnected` until it connects
//! again, so status queries can tell "never seen" from "gone".
//!
//! ```text
//! Connected  ──►  Disconnected  ──►  Connected  (reconnect, new connection id)
//! ```

use std::collections::HashMap;

use uuid::Uuid;

/// Current state of a secondary connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Endpoint exists and its edges are live.
    Connected,
    /// Endpoint was removed; `reason` says why.
    Disconnected { reason: String },
}

/// Runtime state for one secondary.
#[derive(Debug, Clone)]
pub struct ClientRuntimeState {
    pub name: String,
    pub connection_id: Uuid,
    pub connection_state: ConnectionState,
}

/// In-memory registry of all secondaries seen this session.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, ClientRuntimeState>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection for `name`, replacing any previous entry.
    pub fn connect(&mut self, name: impl Into<String>, connection_id: Uuid) {
        let name = name.into();
        self.clients.insert(
            name.clone(),
            ClientRuntimeState {
                name,
                connection_id,
                connection_state: ConnectionState::Connected,
            },
        );
    }

    /// Marks `name` as disconnected.  Unknown names are ignored.
    pub fn disconnect(&mut self, name: &str, reason: impl Into<String>) {
        if let Some(client) = self.clients.get_mut(name) {
            client.connection_state = ConnectionState::Disconnected {
                reason: reason.into(),
            };
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClientRuntimeState> {
        self.clients.get(name)
    }

    pub fn is_connected(&self, name: &str) -> bool {
        self.clients
            .get(name)
            .is_some_and(|c| c.connection_state == ConnectionState::Connected)
    }

    /// Returns a snapshot of all clients, sorted by name.
    pub fn all(&self) -> Vec<ClientRuntimeState> {
        let mut all: Vec<_> = self.clients.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_starts_empty() {
        let registry = ClientRegistry::new();
        assert!(registry.all().is_empty());
        assert!(!registry.is_connected("laptop"));
    }

    #[test]
    fn test_connect_adds_connected_client() {
        let mut registry = ClientRegistry::new();
        let id = Uuid::new_v4();

        registry.connect("laptop", id);

        let state = registry.get("laptop").unwrap();
        assert_eq!(state.connection_id, id);
        assert_eq!(state.connection_state, ConnectionState::Connected);
    }

    #[test]
    fn test_disconnect_keeps_entry_with_reason() {
        let mut registry = ClientRegistry::new();
        registry.connect("laptop", Uuid::new_v4());

        registry.disconnect("laptop", "enter timeout");

        assert!(!registry.is_connected("laptop"));
        assert_eq!(
            registry.get("laptop").unwrap().connection_state,
            ConnectionState::Disconnected {
                reason: "enter timeout".to_string()
            }
        );
    }

    #[test]
    fn test_all_lists_every_client_sorted_by_name() {
        let mut registry = ClientRegistry::new();
        registry.connect("tablet", Uuid::new_v4());
        registry.connect("laptop", Uuid::new_v4());
        registry.disconnect("tablet", "closed");

        let all = registry.all();

        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["laptop", "tablet"]);
        assert!(matches!(all[1].connection_state, ConnectionState::Disconnected { .. }));
    }

    #[test]
    fn test_reconnect_replaces_connection_id() {
        let mut registry = ClientRegistry::new();
        registry.connect("laptop", Uuid::new_v4());
        registry.disconnect("laptop", "closed");
        let second = Uuid::new_v4();

        registry.connect("laptop", second);

        assert!(registry.is_connected("laptop"));
        assert_eq!(registry.get("laptop").unwrap().connection_id, second);
    }

    #[test]
    fn test_disconnect_unknown_is_ignored() {
        let mut registry = ClientRegistry::new();
        registry.disconnect("ghost", "closed");
        assert!(registry.get("ghost").is_none());
    }

    #[test]
    fn test_all_is_sorted_by_name() {
        let mut registry = ClientRegistry::new();
        registry.connect("zeta", Uuid::new_v4());
        registry.connect("alpha", Uuid::new_v4());
        let names: Vec<_> = registry.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
