//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{HubError, ValueObjectError};

/// メッセージ送信（ingress）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Empty / too long message; answered with 400 and never published
    #[error("invalid message: {0}")]
    Validation(#[from] ValueObjectError),

    #[error("failed to publish message: {0}")]
    Publish(#[from] HubError),
}

/// 接続登録のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Hub(#[from] HubError),

    #[error("failed to subscribe on connect: {0}")]
    Subscribe(#[from] SubscribeError),
}

/// 購読・購読解除のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("invalid channel: {0}")]
    InvalidChannel(#[from] ValueObjectError),

    #[error("failed to subscribe: {0}")]
    Hub(#[from] HubError),
}
