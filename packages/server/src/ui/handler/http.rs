//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ChannelSummaryDto, SendMessageRequest, StatusResponse},
    ui::state::AppState,
    usecase::{SendMessageError, SendMessageUseCase},
};

type StatusReply = (StatusCode, Json<StatusResponse>);

fn bad_request(reason: impl Into<String>) -> StatusReply {
    (
        StatusCode::BAD_REQUEST,
        Json(StatusResponse::error(reason)),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// `POST /api/chat/send`
///
/// Answers `{"status":"ok"}` once the message is routed, however many
/// subscribers actually got it. Blank, missing or unparseable messages get
/// 400 and are never published.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> StatusReply {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected send request: {}", rejection.body_text());
            return bad_request(rejection.body_text());
        }
    };

    let Some(message) = request.message else {
        tracing::warn!("Rejected send request without message");
        return bad_request("message is required");
    };
    if let Some(timestamp) = &request.timestamp {
        tracing::debug!("Client sent message at {}", timestamp);
    }

    let usecase = SendMessageUseCase::new(
        state.hub.clone(),
        state.ingress_channel.clone(),
        state.ingress_event.clone(),
    );

    match usecase.execute(&message).await {
        Ok(report) => {
            if !report.failed.is_empty() || !report.deferred.is_empty() {
                tracing::debug!(
                    "{} subscriber(s) dropped, {} backlogged during publish",
                    report.failed.len(),
                    report.deferred.len()
                );
            }
            (StatusCode::OK, Json(StatusResponse::ok()))
        }
        Err(SendMessageError::Validation(e)) => {
            tracing::warn!("Rejected send request: {}", e);
            bad_request(e.to_string())
        }
        Err(e @ SendMessageError::Publish(_)) => {
            tracing::error!("{}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error(e.to_string())),
            )
        }
    }
}

/// List channels that currently have subscribers
pub async fn list_channels(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelSummaryDto>> {
    let channels = state
        .hub
        .channel_summaries()
        .await
        .into_iter()
        .map(|summary| ChannelSummaryDto {
            name: summary.name.into_string(),
            subscribers: summary.subscribers,
        })
        .collect();

    Json(channels)
}
