//! Inbound webhook endpoint.
//!
//! Callers are authorized by network origin only ([`TrustGate`]). The Bot API
//! integration here does not sign requests, so there is no credential check;
//! anything inside a trusted range can post updates.

mod handler;
mod rejection;
mod state;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::dispatcher::Dispatcher;
use crate::trust::TrustGate;
use crate::url::TELEGRAM_WEBHOOK_PATH;

pub use rejection::InboundRejection;
use state::WebhookListenerState;

/// Router serving `POST /api/telegram_webhooks`.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// caller address is available to the trust gate.
pub fn build_webhook_listener(
    trust_gate: Arc<TrustGate>,
    dispatcher: Arc<dyn Dispatcher>,
) -> Router {
    let state = WebhookListenerState {
        trust_gate,
        dispatcher,
    };
    Router::new()
        .route(TELEGRAM_WEBHOOK_PATH, post(handler::telegram_webhook_handler))
        .with_state(state)
}
