// File: crates/bookify_gcal/src/connection.rs
//! Per-host calendar connection storage.
//!
//! Tokens live in memory for the lifetime of the process; a host that
//! disconnects (or a restart) requires a fresh OAuth round-trip.

use bookify_common::services::SyncConnectionStatus;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// Stored credentials for one host's external calendar.
#[derive(Debug, Clone)]
pub struct HostConnection {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub email: Option<String>,
}

impl HostConnection {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Default)]
pub struct ConnectionStore {
    connections: RwLock<HashMap<String, HostConnection>>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, host_id: &str) -> Option<HostConnection> {
        self.connections
            .read()
            .expect("connection store lock poisoned")
            .get(host_id)
            .cloned()
    }

    pub fn insert(&self, host_id: &str, connection: HostConnection) {
        self.connections
            .write()
            .expect("connection store lock poisoned")
            .insert(host_id.to_string(), connection);
    }

    /// Replaces the access token after a refresh, keeping the stored
    /// refresh token and email.
    pub fn update_access_token(
        &self,
        host_id: &str,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) {
        let mut guard = self
            .connections
            .write()
            .expect("connection store lock poisoned");
        if let Some(connection) = guard.get_mut(host_id) {
            connection.access_token = access_token;
            connection.expires_at = expires_at;
        }
    }

    /// Forgets the host's credentials. Returns whether anything was stored.
    pub fn remove(&self, host_id: &str) -> bool {
        self.connections
            .write()
            .expect("connection store lock poisoned")
            .remove(host_id)
            .is_some()
    }

    pub fn status(&self, host_id: &str) -> SyncConnectionStatus {
        match self.get(host_id) {
            Some(connection) => SyncConnectionStatus {
                connected: true,
                expired: connection.is_expired() && connection.refresh_token.is_none(),
                email: connection.email,
            },
            None => SyncConnectionStatus::disconnected(),
        }
    }
}
