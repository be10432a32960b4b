//! UseCase: 購読者接続処理
//!
//! WebSocket 接続ごとに ConnectionId を払い出し、Hub に送信キューを登録します。
//! 接続時にチャンネルが指定されていれば、そのまま購読まで行います。

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::{BroadcastHub, ConnectionId, ConnectionIdFactory};

use super::{error::ConnectError, subscribe_channel::SubscribeChannelUseCase};

/// 購読者接続のユースケース
pub struct ConnectSubscriberUseCase {
    hub: Arc<dyn BroadcastHub>,
}

impl ConnectSubscriberUseCase {
    /// 新しい ConnectSubscriberUseCase を作成
    pub fn new(hub: Arc<dyn BroadcastHub>) -> Self {
        Self { hub }
    }

    /// 接続を登録する
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続の送信キュー
    /// * `initial_channel` - 接続直後に購読するチャンネル名（任意）
    ///
    /// # Returns
    ///
    /// 払い出した ConnectionId。初期購読に失敗した場合は登録も取り消す
    pub async fn execute(
        &self,
        sender: mpsc::Sender<String>,
        initial_channel: Option<&str>,
    ) -> Result<ConnectionId, ConnectError> {
        let connection_id = ConnectionIdFactory::generate();
        self.hub.connect(connection_id.clone(), sender).await?;

        if let Some(channel) = initial_channel {
            let subscribe = SubscribeChannelUseCase::new(self.hub.clone());
            if let Err(e) = subscribe.subscribe(&connection_id, channel).await {
                self.hub.disconnect(&connection_id).await;
                return Err(e.into());
            }
        }

        Ok(connection_id)
    }
}
