use std::{collections::HashMap, sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{domain::UserId, errors::TransportError};

use super::connection::{ConnectionId, LiveConnection};

type Handle = Arc<dyn LiveConnection>;

/// Concurrent multimap of user → live connections.
///
/// Locking is per user shard, so registrations for one user never block fan-out
/// to another. No payload is queued for users without connections.
pub struct ConnectionRegistry {
    connections: DashMap<UserId, HashMap<ConnectionId, Handle>>,
    send_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            connections: DashMap::new(),
            send_timeout,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    pub fn register(&self, user: UserId, connection: Handle) -> ConnectionId {
        let id = Uuid::new_v4();
        self.connections
            .entry(user)
            .or_default()
            .insert(id, connection);
        debug!(user_id = user, connection_id = %id, "connection registered");
        id
    }

    /// Removes and closes one connection. Returns whether it was registered.
    pub async fn unregister(&self, user: UserId, id: ConnectionId) -> bool {
        match self.detach(user, id) {
            Some(connection) => {
                connection.close().await;
                debug!(user_id = user, connection_id = %id, "connection unregistered");
                true
            }
            None => false,
        }
    }

    fn detach(&self, user: UserId, id: ConnectionId) -> Option<Handle> {
        let removed = self
            .connections
            .get_mut(&user)
            .and_then(|mut entry| entry.remove(&id));
        self.connections.remove_if(&user, |_, set| set.is_empty());
        removed
    }

    fn targets(&self, user: UserId) -> Vec<(ConnectionId, Handle)> {
        self.connections
            .get(&user)
            .map(|entry| {
                entry
                    .iter()
                    .map(|(id, connection)| (*id, Arc::clone(connection)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sends `payload` to every live connection of `user`, pruning each one that fails.
    ///
    /// Returns the number of connections that accepted the payload. The shard lock is
    /// released before any send is awaited.
    pub async fn broadcast(&self, user: UserId, payload: &str) -> usize {
        let targets = self.targets(user);
        if targets.is_empty() {
            return 0;
        }

        let payload: Arc<str> = Arc::from(payload);
        let send_timeout = self.send_timeout;
        let mut sends = JoinSet::new();
        for (id, connection) in targets {
            let payload = Arc::clone(&payload);
            sends.spawn(async move {
                let outcome = if connection.is_open() {
                    match tokio::time::timeout(send_timeout, connection.send(&payload)).await {
                        Ok(result) => result,
                        Err(_) => Err(TransportError::Timeout),
                    }
                } else {
                    Err(TransportError::Closed)
                };
                (id, outcome)
            });
        }

        let mut delivered = 0;
        while let Some(joined) = sends.join_next().await {
            match joined {
                Ok((_, Ok(()))) => delivered += 1,
                Ok((id, Err(err))) => self.prune(user, id, &err).await,
                Err(err) => warn!(user_id = user, error = %err, "send task failed"),
            }
        }
        delivered
    }

    /// Delivers `payload` to a single connection; a failure prunes it.
    pub async fn send_to(&self, user: UserId, id: ConnectionId, payload: &str) -> bool {
        let connection = self
            .connections
            .get(&user)
            .and_then(|entry| entry.get(&id).cloned());
        let Some(connection) = connection else {
            return false;
        };
        let outcome = if connection.is_open() {
            match tokio::time::timeout(self.send_timeout, connection.send(payload)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            }
        } else {
            Err(TransportError::Closed)
        };
        match outcome {
            Ok(()) => true,
            Err(err) => {
                self.prune(user, id, &err).await;
                false
            }
        }
    }

    async fn prune(&self, user: UserId, id: ConnectionId, reason: &TransportError) {
        if let Some(connection) = self.detach(user, id) {
            warn!(user_id = user, connection_id = %id, error = %reason, "pruning connection");
            connection.close().await;
        }
    }

    /// Pings every connection, bounded by `deadline`; non-responders are pruned.
    ///
    /// Returns the number of pruned connections.
    pub async fn sweep_heartbeats(&self, deadline: Duration) -> usize {
        let snapshot: Vec<(UserId, ConnectionId, Handle)> = self
            .connections
            .iter()
            .flat_map(|entry| {
                let user = *entry.key();
                entry
                    .value()
                    .iter()
                    .map(|(id, connection)| (user, *id, Arc::clone(connection)))
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut pings = JoinSet::new();
        for (user, id, connection) in snapshot {
            pings.spawn(async move {
                let outcome = if connection.is_open() {
                    match tokio::time::timeout(deadline, connection.ping()).await {
                        Ok(result) => result,
                        Err(_) => Err(TransportError::Timeout),
                    }
                } else {
                    Err(TransportError::Closed)
                };
                (user, id, outcome)
            });
        }

        let mut pruned = 0;
        while let Some(joined) = pings.join_next().await {
            if let Ok((user, id, Err(err))) = joined {
                self.prune(user, id, &err).await;
                pruned += 1;
            }
        }
        pruned
    }

    pub fn connection_count(&self, user: UserId) -> usize {
        self.connections.get(&user).map_or(0, |entry| entry.len())
    }

    pub fn total_connections(&self) -> usize {
        self.connections.iter().map(|entry| entry.len()).sum()
    }

    /// Users with at least one live connection, ascending.
    pub fn connected_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .connections
            .iter()
            .filter(|entry| !entry.is_empty())
            .map(|entry| *entry.key())
            .collect();
        users.sort_unstable();
        users
    }

    /// Closes and removes every registered connection.
    pub async fn shutdown(&self) {
        let users: Vec<UserId> = self.connections.iter().map(|entry| *entry.key()).collect();
        let mut closed = 0usize;
        for user in users {
            if let Some((_, set)) = self.connections.remove(&user) {
                for connection in set.into_values() {
                    connection.close().await;
                    closed += 1;
                }
            }
        }
        debug!(closed, "connection registry shut down");
    }
}
