//! Registry of open pages
//!
//! Activation claims every registered page so fetches route through the
//! new worker without waiting for a navigation.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Handle for one open page
#[derive(Debug, Clone)]
pub struct Client {
    /// Unique client ID
    pub id: Uuid,
    /// Page URL at registration time
    pub url: String,
    /// Whether this worker controls the page
    pub controlled: bool,
}

/// Tracks the pages a worker may claim
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<Uuid, Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open page; returns its client ID
    pub fn register(&self, url: impl Into<String>) -> Uuid {
        let client = Client {
            id: Uuid::new_v4(),
            url: url.into(),
            controlled: false,
        };
        let id = client.id;
        self.clients
            .write()
            .expect("client registry lock poisoned")
            .insert(id, client);
        id
    }

    /// Remove a page (closed tab). Returns false if unknown.
    pub fn unregister(&self, id: Uuid) -> bool {
        self.clients
            .write()
            .expect("client registry lock poisoned")
            .remove(&id)
            .is_some()
    }

    /// Take control of every registered page; returns how many were newly claimed
    pub fn claim(&self) -> usize {
        let mut clients = self
            .clients
            .write()
            .expect("client registry lock poisoned");
        let mut claimed = 0;
        for client in clients.values_mut() {
            if !client.controlled {
                client.controlled = true;
                claimed += 1;
            }
        }
        debug!("Claimed {} clients", claimed);
        claimed
    }

    /// Whether the given page is controlled by this worker
    pub fn is_controlled(&self, id: Uuid) -> bool {
        self.clients
            .read()
            .expect("client registry lock poisoned")
            .get(&id)
            .map(|c| c.controlled)
            .unwrap_or(false)
    }

    /// Number of registered pages
    pub fn len(&self) -> usize {
        self.clients
            .read()
            .expect("client registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
