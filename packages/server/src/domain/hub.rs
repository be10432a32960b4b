//! Broadcast hub contract.
//!
//! The domain layer defines the trait; `infrastructure::hub` provides the
//! in-memory implementation. UseCases depend on the trait only.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::{ChannelSummary, Envelope, PublishReport},
    error::HubError,
    value_object::{ChannelName, ConnectionId},
};

/// Registry of live connections and their channel subscriptions, plus fan-out.
///
/// Every operation is linearizable with respect to the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastHub: Send + Sync {
    /// Register a live connection. `sender` is its outbound queue.
    async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<String>,
    ) -> Result<(), HubError>;

    /// Subscribe a connection to a channel, creating the channel on first use.
    ///
    /// Returns `false` when the connection was already subscribed.
    async fn subscribe(
        &self,
        connection_id: &ConnectionId,
        channel: ChannelName,
    ) -> Result<bool, HubError>;

    /// Unsubscribe a connection from one channel. Returns whether it was subscribed.
    async fn unsubscribe(&self, connection_id: &ConnectionId, channel: &ChannelName) -> bool;

    /// Remove a connection from every channel and the registry.
    ///
    /// Idempotent; returns `false` when the connection was already gone.
    async fn disconnect(&self, connection_id: &ConnectionId) -> bool;

    /// Deliver `envelope` to the subscribers of its channel as of now.
    ///
    /// Never waits on a subscriber: full queues are drained in the background.
    async fn publish(&self, envelope: &Envelope) -> Result<PublishReport, HubError>;

    /// Channels with at least one subscriber, sorted by name.
    async fn channel_summaries(&self) -> Vec<ChannelSummary>;

    async fn subscriber_count(&self, channel: &ChannelName) -> usize;

    async fn connection_count(&self) -> usize;
}
