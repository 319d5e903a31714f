use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::StatusCode,
};

use super::rejection::InboundRejection;
use super::state::WebhookListenerState;
use crate::update::Update;

pub(super) async fn telegram_webhook_handler(
    State(state): State<WebhookListenerState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<StatusCode, InboundRejection> {
    let remote_ip = remote.ip();
    if !state.trust_gate.is_allowed(remote_ip) {
        tracing::warn!(remote_addr = %remote_ip, "Access denied");
        return Err(InboundRejection::AccessDenied);
    }

    let update = match Update::from_slice(&body) {
        Ok(update) => update,
        Err(error) => {
            tracing::debug!(
                remote_addr = %remote_ip,
                error = %error,
                "Rejecting malformed webhook payload"
            );
            return Err(InboundRejection::MalformedPayload);
        }
    };

    tracing::debug!(
        update_id = update.update_id,
        kind = ?update.kind(),
        chat_id = ?update.chat_id(),
        "Received Telegram update"
    );
    state.dispatcher.process(update);
    Ok(StatusCode::OK)
}
