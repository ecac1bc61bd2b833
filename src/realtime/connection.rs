use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::TransportError;

/// Registry-assigned handle identifier.
pub type ConnectionId = Uuid;

/// A duplex client connection supplied by the transport layer.
///
/// The registry owns the handle while it is registered and closes it when it is
/// pruned or unregistered.
#[async_trait]
pub trait LiveConnection: Send + Sync {
    async fn send(&self, payload: &str) -> Result<(), TransportError>;

    /// Resolves once the peer answers the ping.
    async fn ping(&self) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    async fn close(&self);
}
