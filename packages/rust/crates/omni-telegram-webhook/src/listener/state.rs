use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::trust::TrustGate;

#[derive(Clone)]
pub(super) struct WebhookListenerState {
    pub(super) trust_gate: Arc<TrustGate>,
    pub(super) dispatcher: Arc<dyn Dispatcher>,
}
