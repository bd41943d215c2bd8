// --- File: crates/bookify_scheduling/src/directory.rs ---
//! Lookup registry for the entities bookings reference.
//!
//! Clients and services are owned by the surrounding CRM; the core only
//! stores their ids on bookings and resolves them here for display. A
//! reference that cannot be resolved expands to nothing and the caller
//! renders a placeholder, it is never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Display summary of a client, as mirrored from the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// Display summary of a service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub duration_minutes: Option<i64>,
}

#[derive(Default)]
pub struct DirectoryStore {
    clients: RwLock<HashMap<String, ClientRecord>>,
    services: RwLock<HashMap<String, ServiceRecord>>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_client(&self, client: ClientRecord) {
        self.clients
            .write()
            .expect("directory lock poisoned")
            .insert(client.id.clone(), client);
    }

    pub fn upsert_service(&self, service: ServiceRecord) {
        self.services
            .write()
            .expect("directory lock poisoned")
            .insert(service.id.clone(), service);
    }

    pub fn client(&self, client_id: &str) -> Option<ClientRecord> {
        self.clients
            .read()
            .expect("directory lock poisoned")
            .get(client_id)
            .cloned()
    }

    pub fn service(&self, service_id: &str) -> Option<ServiceRecord> {
        self.services
            .read()
            .expect("directory lock poisoned")
            .get(service_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_references_resolve_to_none() {
        let directory = DirectoryStore::new();
        assert!(directory.client("nobody").is_none());
        assert!(directory.service("nothing").is_none());
    }

    #[test]
    fn upserts_replace_existing_records() {
        let directory = DirectoryStore::new();
        directory.upsert_client(ClientRecord {
            id: "client-1".to_string(),
            name: "Acme".to_string(),
            email: None,
        });
        directory.upsert_client(ClientRecord {
            id: "client-1".to_string(),
            name: "Acme GmbH".to_string(),
            email: Some("ops@acme.example".to_string()),
        });

        let stored = directory.client("client-1").unwrap();
        assert_eq!(stored.name, "Acme GmbH");
        assert_eq!(stored.email.as_deref(), Some("ops@acme.example"));
    }
}
