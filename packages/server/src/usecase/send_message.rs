//! UseCase: メッセージ送信処理（ingress → router → hub）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - バリデーション → Envelope 生成 → publish の流れ
//!
//! ### なぜこのテストが必要か
//! - 空メッセージが Hub まで到達しないことを保証する（publish 呼び出し 0 回）
//! - 配送結果に関わらず送信者には成功が返ることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：購読者 2 人への配送
//! - 異常系：空・空白のみのメッセージ
//! - エッジケース：購読者ゼロ、キューが埋まった購読者（応答を遅らせない）

use std::sync::Arc;

use crate::domain::{BroadcastHub, ChannelName, EventName, EventRouter, PublishReport};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Arc<dyn BroadcastHub>,
    /// 配送先チャンネル（通常は "chat"）
    channel: ChannelName,
    /// イベント名（通常は "message.sent"）
    event: EventName,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(hub: Arc<dyn BroadcastHub>, channel: ChannelName, event: EventName) -> Self {
        Self {
            hub,
            channel,
            event,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(PublishReport)` - ルーティング成功（購読者ごとの配送成否は含むが、失敗扱いにはしない）
    /// * `Err(SendMessageError::Validation)` - 空メッセージなど。Hub には到達しない
    pub async fn execute(&self, raw_message: &str) -> Result<PublishReport, SendMessageError> {
        let envelope = EventRouter::route(raw_message, self.channel.as_str(), self.event.as_str())?;

        let report = self.hub.publish(&envelope).await?;
        tracing::info!(
            "Published '{}' on channel '{}': {}/{} delivered",
            self.event,
            report.channel,
            report.delivered,
            report.attempted
        );

        Ok(report)
    }
}
