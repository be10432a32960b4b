//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層（BroadcastHub trait, EventRouter）を操作します。

pub mod connect_subscriber;
pub mod disconnect_subscriber;
pub mod error;
pub mod send_message;
pub mod subscribe_channel;

pub use connect_subscriber::ConnectSubscriberUseCase;
pub use disconnect_subscriber::DisconnectSubscriberUseCase;
pub use error::{ConnectError, SendMessageError, SubscribeError};
pub use send_message::SendMessageUseCase;
pub use subscribe_channel::SubscribeChannelUseCase;
