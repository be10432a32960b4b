//! UseCase: チャンネル購読・購読解除

use std::sync::Arc;

use crate::domain::{BroadcastHub, ChannelName, ConnectionId};

use super::error::SubscribeError;

/// チャンネル購読のユースケース
pub struct SubscribeChannelUseCase {
    hub: Arc<dyn BroadcastHub>,
}

impl SubscribeChannelUseCase {
    pub fn new(hub: Arc<dyn BroadcastHub>) -> Self {
        Self { hub }
    }

    /// 購読する（既に購読済みなら何もしない）
    ///
    /// 購読したチャンネル名を返す
    pub async fn subscribe(
        &self,
        connection_id: &ConnectionId,
        channel: &str,
    ) -> Result<ChannelName, SubscribeError> {
        let channel = ChannelName::try_from(channel)?;
        let added = self.hub.subscribe(connection_id, channel.clone()).await?;
        if added {
            tracing::info!("Connection '{}' subscribed to '{}'", connection_id, channel);
        } else {
            tracing::debug!(
                "Connection '{}' already subscribed to '{}'",
                connection_id,
                channel
            );
        }
        Ok(channel)
    }

    /// 購読解除する。購読していたかどうかを返す
    pub async fn unsubscribe(
        &self,
        connection_id: &ConnectionId,
        channel: &str,
    ) -> Result<bool, SubscribeError> {
        let channel = ChannelName::try_from(channel)?;
        let removed = self.hub.unsubscribe(connection_id, &channel).await;
        if removed {
            tracing::info!(
                "Connection '{}' unsubscribed from '{}'",
                connection_id,
                channel
            );
        }
        Ok(removed)
    }
}
