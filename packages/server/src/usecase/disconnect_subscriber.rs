//! UseCase: 購読者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSubscriberUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断処理は WebSocket の終了時と配送失敗時の両方から呼ばれ得るため、冪等である必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：購読中の接続の切断
//! - エッジケース：既に切断済みの接続の再切断

use std::sync::Arc;

use crate::domain::{BroadcastHub, ConnectionId};

/// 購読者切断のユースケース
pub struct DisconnectSubscriberUseCase {
    hub: Arc<dyn BroadcastHub>,
}

impl DisconnectSubscriberUseCase {
    /// 新しい DisconnectSubscriberUseCase を作成
    pub fn new(hub: Arc<dyn BroadcastHub>) -> Self {
        Self { hub }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `true` - 接続を Hub から取り除いた
    /// * `false` - 既に取り除かれていた（配送失敗による除去など）
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.hub.disconnect(connection_id).await;
        if removed {
            tracing::info!("Connection '{}' removed from hub", connection_id);
        } else {
            tracing::debug!("Connection '{}' was already removed", connection_id);
        }
        removed
    }
}
