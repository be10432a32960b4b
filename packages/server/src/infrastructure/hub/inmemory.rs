//! InMemory Broadcast Hub 実装
//!
//! ドメイン層が定義する BroadcastHub trait の具体的な実装。
//! 接続レジストリ（接続 ID → 送信キュー）とチャンネル（チャンネル名 → 購読者集合）を
//! 1 つの Mutex で保護します。publish はロック内で `try_send` するだけで、購読者を待ちません。
//!
//! ## 配送ポリシー
//!
//! - 各接続は上限付きキュー（`mpsc::Sender<String>`）を持つ
//! - キューが満杯なら Envelope はその接続のバックログに積まれ、バックグラウンドタスクが
//!   `send_timeout` 付きで順番に流し込む
//! - `send_timeout` 以内に空かない、またはバックログが上限を超えた接続は切断する
//! - 1 つの購読者の失敗が他の購読者への配送や送信者への応答を遅らせることはない

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use dengon_shared::time::timestamp_to_jst_rfc3339;
use tokio::sync::{
    Mutex,
    mpsc::{
        self,
        error::{SendTimeoutError, TrySendError},
    },
};

use crate::domain::{
    BroadcastHub, Channel, ChannelName, ChannelSummary, ConnectionId, DeliveryError, Envelope,
    HubError, PublishReport, Timestamp,
};

/// Default bound on how long a backlogged envelope waits for one subscriber's queue.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(500);

/// Default capacity of each connection's outbound queue (and of its backlog).
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Delivery settings of the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    pub send_timeout: Duration,
    pub queue_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_timeout: DEFAULT_SEND_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// 接続中の購読者
struct Subscriber {
    sender: mpsc::Sender<String>,
    channels: HashSet<ChannelName>,
    connected_at: Timestamp,
    /// キュー満杯時に待たせている Envelope。`Some` の間はドレインタスクが動いている
    backlog: Option<VecDeque<String>>,
}

/// 1 購読者への投入結果
enum Enqueue {
    Delivered,
    /// バックログに積んだ。`Some` なら新しくドレインタスクを起動する
    Deferred(Option<mpsc::Sender<String>>),
    Failed(DeliveryError),
}

impl Subscriber {
    /// Hand `frame` to this subscriber without waiting.
    ///
    /// Once a backlog exists every later frame joins it, so per-connection
    /// order is kept.
    fn enqueue(&mut self, frame: String, backlog_limit: usize) -> Enqueue {
        if let Some(backlog) = self.backlog.as_mut() {
            if backlog.len() >= backlog_limit {
                return Enqueue::Failed(DeliveryError::BacklogFull {
                    limit: backlog_limit,
                });
            }
            backlog.push_back(frame);
            return Enqueue::Deferred(None);
        }
        match self.sender.try_send(frame) {
            Ok(()) => Enqueue::Delivered,
            Err(TrySendError::Closed(_)) => Enqueue::Failed(DeliveryError::Closed),
            Err(TrySendError::Full(frame)) => {
                self.backlog = Some(VecDeque::from([frame]));
                Enqueue::Deferred(Some(self.sender.clone()))
            }
        }
    }
}

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, Subscriber>,
    channels: HashMap<ChannelName, Channel>,
}

impl Registry {
    fn detach(&mut self, connection_id: &ConnectionId, channel: &ChannelName) {
        if let Some(entry) = self.channels.get_mut(channel) {
            entry.unsubscribe(connection_id);
            if entry.is_empty() {
                self.channels.remove(channel);
                tracing::debug!("Channel '{}' has no subscribers left, dropped", channel);
            }
        }
    }

    fn remove_connection(&mut self, connection_id: &ConnectionId) -> Option<Subscriber> {
        let subscriber = self.connections.remove(connection_id)?;
        for channel in &subscriber.channels {
            self.detach(connection_id, channel);
        }
        Some(subscriber)
    }

    /// Next backlogged frame of `connection_id`; clears the backlog once empty.
    fn next_backlogged(&mut self, connection_id: &ConnectionId) -> Option<String> {
        let subscriber = self.connections.get_mut(connection_id)?;
        let frame = subscriber.backlog.as_mut().and_then(VecDeque::pop_front);
        if frame.is_none() {
            subscriber.backlog = None;
        }
        frame
    }
}

/// インメモリ Broadcast Hub 実装
///
/// プロセス内の全接続を保持します。`Server` が 1 つ生成し、`AppState` 経由で共有します。
pub struct InMemoryBroadcastHub {
    registry: Arc<Mutex<Registry>>,
    config: HubConfig,
}

impl InMemoryBroadcastHub {
    /// 新しい InMemoryBroadcastHub を作成
    pub fn new(config: HubConfig) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            config,
        }
    }

    pub fn config(&self) -> HubConfig {
        self.config
    }
}

impl Default for InMemoryBroadcastHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

async fn deliver(
    sender: &mpsc::Sender<String>,
    frame: String,
    timeout: Duration,
) -> Result<(), DeliveryError> {
    sender
        .send_timeout(frame, timeout)
        .await
        .map_err(|e| match e {
            SendTimeoutError::Closed(_) => DeliveryError::Closed,
            SendTimeoutError::Timeout(_) => DeliveryError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
        })
}

/// バックログを 1 件ずつ `send_timeout` 付きで流し込む。失敗したら接続を切断する
async fn drain_backlog(
    registry: Arc<Mutex<Registry>>,
    connection_id: ConnectionId,
    sender: mpsc::Sender<String>,
    timeout: Duration,
) {
    loop {
        let Some(frame) = registry.lock().await.next_backlogged(&connection_id) else {
            return;
        };
        if let Err(e) = deliver(&sender, frame, timeout).await {
            tracing::warn!("Dropping backlogged subscriber '{}': {}", connection_id, e);
            registry.lock().await.remove_connection(&connection_id);
            return;
        }
    }
}

#[async_trait]
impl BroadcastHub for InMemoryBroadcastHub {
    async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<String>,
    ) -> Result<(), HubError> {
        let mut registry = self.registry.lock().await;
        if registry.connections.contains_key(&connection_id) {
            return Err(HubError::DuplicateConnection(connection_id));
        }
        registry.connections.insert(
            connection_id,
            Subscriber {
                sender,
                channels: HashSet::new(),
                connected_at: Timestamp::now(),
                backlog: None,
            },
        );
        Ok(())
    }

    async fn subscribe(
        &self,
        connection_id: &ConnectionId,
        channel: ChannelName,
    ) -> Result<bool, HubError> {
        let mut registry = self.registry.lock().await;
        let Some(subscriber) = registry.connections.get_mut(connection_id) else {
            return Err(HubError::ConnectionNotFound(connection_id.clone()));
        };
        if !subscriber.channels.insert(channel.clone()) {
            return Ok(false);
        }
        registry
            .channels
            .entry(channel.clone())
            .or_insert_with(|| Channel::new(channel))
            .subscribe(connection_id.clone());
        Ok(true)
    }

    async fn unsubscribe(&self, connection_id: &ConnectionId, channel: &ChannelName) -> bool {
        let mut registry = self.registry.lock().await;
        let removed = registry
            .connections
            .get_mut(connection_id)
            .is_some_and(|subscriber| subscriber.channels.remove(channel));
        if removed {
            registry.detach(connection_id, channel);
        }
        removed
    }

    async fn disconnect(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.registry.lock().await.remove_connection(connection_id);
        match removed {
            Some(subscriber) => {
                tracing::debug!(
                    "Connection '{}' removed from {} channel(s) (connected since {})",
                    connection_id,
                    subscriber.channels.len(),
                    timestamp_to_jst_rfc3339(subscriber.connected_at.value())
                );
                true
            }
            None => false,
        }
    }

    async fn publish(&self, envelope: &Envelope) -> Result<PublishReport, HubError> {
        let frame =
            serde_json::to_string(envelope).map_err(|e| HubError::Serialization(e.to_string()))?;
        let mut report = PublishReport::empty(envelope.channel().clone());
        let mut drainers = Vec::new();

        {
            // Subscribers joining after this point do not receive this envelope.
            let mut registry = self.registry.lock().await;
            let targets: Vec<ConnectionId> = match registry.channels.get(envelope.channel()) {
                Some(channel) => channel.subscriber_ids().cloned().collect(),
                None => Vec::new(),
            };

            for id in targets {
                let Some(subscriber) = registry.connections.get_mut(&id) else {
                    continue;
                };
                report.attempted += 1;
                match subscriber.enqueue(frame.clone(), self.config.queue_capacity) {
                    Enqueue::Delivered => report.delivered += 1,
                    Enqueue::Deferred(drain) => {
                        if let Some(sender) = drain {
                            drainers.push((id.clone(), sender));
                        }
                        report.deferred.push(id);
                    }
                    Enqueue::Failed(e) => {
                        tracing::warn!(
                            "Failed to deliver '{}' on channel '{}' to '{}': {}",
                            envelope.event(),
                            envelope.channel(),
                            id,
                            e
                        );
                        report.failed.push(id);
                    }
                }
            }
            for id in &report.failed {
                registry.remove_connection(id);
            }
        }

        if report.attempted == 0 {
            tracing::debug!("No subscribers on channel '{}'", envelope.channel());
        }
        for (id, sender) in drainers {
            tracing::debug!("Queue of '{}' is full, draining backlog in background", id);
            tokio::spawn(drain_backlog(
                self.registry.clone(),
                id,
                sender,
                self.config.send_timeout,
            ));
        }

        Ok(report)
    }

    async fn channel_summaries(&self) -> Vec<ChannelSummary> {
        let registry = self.registry.lock().await;
        let mut summaries: Vec<ChannelSummary> =
            registry.channels.values().map(Channel::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    async fn subscriber_count(&self, channel: &ChannelName) -> usize {
        let registry = self.registry.lock().await;
        registry.channels.get(channel).map_or(0, Channel::len)
    }

    async fn connection_count(&self) -> usize {
        self.registry.lock().await.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CHAT_CHANNEL, ConnectionIdFactory, EventRouter, MESSAGE_SENT_EVENT};
    use std::sync::Arc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryBroadcastHub の購読管理（subscribe / unsubscribe / disconnect）
    // - publish のファンアウトと配送失敗時の購読者除去
    //
    // 【なぜこのテストが必要か】
    // - Hub はメッセージ配送の中核であり、購読者集合の整合性を保証する必要がある
    // - 遅い・切断済みの購読者が他の購読者への配送を妨げないことを担保する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 2 人の購読者への配送
    // 2. 二重購読でも配送は 1 回
    // 3. 購読者ゼロの publish
    // 4. publish 前に切断した購読者には届かない
    // 5. 受信側が閉じた購読者・遅い購読者の除去
    // 6. キュー満杯の購読者がいても publish が待たされないこと、バックログの順序
    // ========================================

    const EXPECTED_HELLO: &str =
        r#"{"channel":"chat","event":"message.sent","payload":{"message":"hello"}}"#;

    fn chat() -> ChannelName {
        ChannelName::new(CHAT_CHANNEL.to_string()).unwrap()
    }

    fn hello() -> Envelope {
        EventRouter::route("hello", CHAT_CHANNEL, MESSAGE_SENT_EVENT).unwrap()
    }

    async fn connect_subscriber(
        hub: &InMemoryBroadcastHub,
        capacity: usize,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionIdFactory::generate();
        let (tx, rx) = mpsc::channel(capacity);
        hub.connect(id.clone(), tx).await.unwrap();
        hub.subscribe(&id, chat()).await.unwrap();
        (id, rx)
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        // テスト項目: "hello" が chat の購読者 2 人の両方に届く
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (_alice, mut rx1) = connect_subscriber(&hub, 8).await;
        let (_bob, mut rx2) = connect_subscriber(&hub, 8).await;

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 2);
        assert!(report.failed.is_empty());
        assert_eq!(rx1.recv().await.unwrap(), EXPECTED_HELLO);
        assert_eq!(rx2.recv().await.unwrap(), EXPECTED_HELLO);
    }

    #[tokio::test]
    async fn test_double_subscribe_delivers_once() {
        // テスト項目: 同じ接続で二度 subscribe しても 1 回の publish で届くのは 1 通
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (id, mut rx) = connect_subscriber(&hub, 8).await;
        let again = hub.subscribe(&id, chat()).await.unwrap();

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert!(!again);
        assert_eq!(report.delivered, 1);
        assert_eq!(rx.recv().await.unwrap(), EXPECTED_HELLO);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        // テスト項目: 購読者がいないチャンネルへの publish は何もせず成功する
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert_eq!(report, PublishReport::empty(chat()));
    }

    #[tokio::test]
    async fn test_publish_only_targets_its_channel() {
        // テスト項目: 別チャンネルの購読者には配送されない
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let other = ConnectionIdFactory::generate();
        let (tx, mut rx) = mpsc::channel(8);
        hub.connect(other.clone(), tx).await.unwrap();
        hub.subscribe(&other, ChannelName::new("news".to_string()).unwrap())
            .await
            .unwrap();

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnected_before_publish_receives_nothing() {
        // テスト項目: publish 前に切断した購読者にはメッセージが届かない
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (gone, mut rx_gone) = connect_subscriber(&hub, 8).await;
        let (_stay, mut rx_stay) = connect_subscriber(&hub, 8).await;
        assert!(hub.disconnect(&gone).await);

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 1);
        assert_eq!(rx_stay.recv().await.unwrap(), EXPECTED_HELLO);
        // Hub が保持していた sender が破棄されているので、受信側は閉じている
        assert!(rx_gone.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_subscriber_is_removed_without_affecting_others() {
        // テスト項目: 受信側が閉じた購読者は配送失敗として除去され、他の購読者には届く
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (closed, rx_closed) = connect_subscriber(&hub, 8).await;
        let (_ok, mut rx_ok) = connect_subscriber(&hub, 8).await;
        drop(rx_closed);

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, vec![closed]);
        assert_eq!(rx_ok.recv().await.unwrap(), EXPECTED_HELLO);
        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.subscriber_count(&chat()).await, 1);
    }

    /// キュー容量 1 を埋めた状態の購読者を登録する
    async fn connect_stalled_subscriber(
        hub: &InMemoryBroadcastHub,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionIdFactory::generate();
        let (tx, rx) = mpsc::channel(1);
        tx.try_send("backlog".to_string()).unwrap();
        hub.connect(id.clone(), tx).await.unwrap();
        hub.subscribe(&id, chat()).await.unwrap();
        (id, rx)
    }

    #[tokio::test]
    async fn test_publish_does_not_wait_for_full_queue() {
        // テスト項目: キューが埋まった購読者がいても publish は send_timeout を待たずに戻る
        // given (前提条件):
        let hub = InMemoryBroadcastHub::new(HubConfig {
            send_timeout: Duration::from_secs(5),
            queue_capacity: 8,
        });
        let (slow, _rx_slow) = connect_stalled_subscriber(&hub).await;
        let (_fast, mut rx_fast) = connect_subscriber(&hub, 8).await;

        // when (操作):
        let started = std::time::Instant::now();
        let report = hub.publish(&hello()).await.unwrap();

        // then (期待する結果):
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.deferred, vec![slow]);
        assert!(report.failed.is_empty());
        assert_eq!(rx_fast.recv().await.unwrap(), EXPECTED_HELLO);
    }

    #[tokio::test]
    async fn test_backlog_is_drained_in_order() {
        // テスト項目: キューが空けばバックログは順番通りに届き、その後は即時配送に戻る
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (slow, mut rx_slow) = connect_stalled_subscriber(&hub).await;
        let first = EventRouter::chat("first").unwrap();
        let second = EventRouter::chat("second").unwrap();
        hub.publish(&first).await.unwrap();
        let report = hub.publish(&second).await.unwrap();
        assert_eq!(report.deferred, vec![slow.clone()]);

        // when (操作):
        let received = vec![
            rx_slow.recv().await.unwrap(),
            rx_slow.recv().await.unwrap(),
            rx_slow.recv().await.unwrap(),
        ];

        // then (期待する結果):
        assert_eq!(received[0], "backlog");
        assert_eq!(received[1], serde_json::to_string(&first).unwrap());
        assert_eq!(received[2], serde_json::to_string(&second).unwrap());

        // ドレインタスクがバックログを片付けるまで待つ
        tokio::time::sleep(Duration::from_millis(50)).await;
        let report = hub.publish(&hello()).await.unwrap();
        assert_eq!(report.delivered, 1);
        assert!(report.deferred.is_empty());
        assert_eq!(rx_slow.recv().await.unwrap(), EXPECTED_HELLO);
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_is_evicted_after_timeout() {
        // テスト項目: send_timeout 以内にキューが空かない購読者はバックグラウンドで除去される
        // given (前提条件):
        let hub = InMemoryBroadcastHub::new(HubConfig {
            send_timeout: Duration::from_millis(50),
            queue_capacity: 8,
        });
        let (slow, _rx_slow) = connect_stalled_subscriber(&hub).await;
        let (_fast, mut rx_fast) = connect_subscriber(&hub, 8).await;

        // when (操作):
        let report = hub.publish(&hello()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        // then (期待する結果):
        assert_eq!(report.deferred, vec![slow.clone()]);
        assert_eq!(rx_fast.recv().await.unwrap(), EXPECTED_HELLO);
        assert_eq!(hub.subscriber_count(&chat()).await, 1);
        assert!(!hub.disconnect(&slow).await);
    }

    #[tokio::test]
    async fn test_backlog_overflow_evicts_immediately() {
        // テスト項目: バックログが上限に達した購読者は publish の時点で除去される
        // given (前提条件):
        let hub = InMemoryBroadcastHub::new(HubConfig {
            send_timeout: Duration::from_secs(5),
            queue_capacity: 1,
        });
        let (slow, _rx_slow) = connect_stalled_subscriber(&hub).await;

        // when (操作): ドレインタスクが 1 件取り出していても上限に届く回数だけ publish する
        let mut failed = Vec::new();
        for _ in 0..3 {
            failed.extend(hub.publish(&hello()).await.unwrap().failed);
        }

        // then (期待する結果):
        assert_eq!(failed, vec![slow]);
        assert_eq!(hub.connection_count().await, 0);
        assert!(hub.channel_summaries().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_duplicate_fails() {
        // テスト項目: 同じ接続 ID の二重登録はエラーになる
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let id = ConnectionIdFactory::generate();
        let (tx1, _rx1) = mpsc::channel(1);
        let (tx2, _rx2) = mpsc::channel(1);
        hub.connect(id.clone(), tx1).await.unwrap();

        // when (操作):
        let result = hub.connect(id.clone(), tx2).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), HubError::DuplicateConnection(id));
    }

    #[tokio::test]
    async fn test_subscribe_unknown_connection_fails() {
        // テスト項目: 未登録の接続は購読できない
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let id = ConnectionIdFactory::generate();

        // when (操作):
        let result = hub.subscribe(&id, chat()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), HubError::ConnectionNotFound(id));
        assert!(hub.channel_summaries().await.is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_empty_channel() {
        // テスト項目: 最後の購読者が抜けたチャンネルは一覧から消える
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (id, _rx) = connect_subscriber(&hub, 8).await;
        assert_eq!(hub.channel_summaries().await.len(), 1);

        // when (操作):
        let first = hub.unsubscribe(&id, &chat()).await;
        let second = hub.unsubscribe(&id, &chat()).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(hub.channel_summaries().await.is_empty());
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        // テスト項目: disconnect は複数回呼んでも安全
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (id, _rx) = connect_subscriber(&hub, 8).await;

        // when (操作):
        let first = hub.disconnect(&id).await;
        let second = hub.disconnect(&id).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(hub.subscriber_count(&chat()).await, 0);
    }

    #[tokio::test]
    async fn test_channel_summaries_sorted_by_name() {
        // テスト項目: チャンネル一覧は名前順で購読者数を含む
        // given (前提条件):
        let hub = InMemoryBroadcastHub::default();
        let (id, _rx) = connect_subscriber(&hub, 8).await;
        hub.subscribe(&id, ChannelName::new("alerts".to_string()).unwrap())
            .await
            .unwrap();
        connect_subscriber(&hub, 8).await;

        // when (操作):
        let summaries = hub.channel_summaries().await;

        // then (期待する結果):
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alerts", "chat"]);
        assert_eq!(summaries[0].subscribers, 1);
        assert_eq!(summaries[1].subscribers, 2);
    }

    #[tokio::test]
    async fn test_concurrent_publish_and_disconnect() {
        // テスト項目: publish と disconnect が並行しても他の購読者への配送は壊れない
        // given (前提条件):
        let hub = Arc::new(InMemoryBroadcastHub::default());
        let (_steady, mut rx_steady) = connect_subscriber(&hub, 64).await;
        let mut leaving = Vec::new();
        for _ in 0..16 {
            let (id, rx) = connect_subscriber(&hub, 64).await;
            leaving.push((id, rx));
        }

        // when (操作):
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let hub = hub.clone();
            tasks.push(tokio::spawn(async move {
                hub.publish(&hello()).await.unwrap();
            }));
        }
        for (id, _rx) in &leaving {
            let hub = hub.clone();
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                hub.disconnect(&id).await;
                hub.disconnect(&id).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        for _ in 0..8 {
            assert_eq!(rx_steady.recv().await.unwrap(), EXPECTED_HELLO);
        }
        assert_eq!(hub.connection_count().await, 1);
    }
}
