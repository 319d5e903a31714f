//! Startup and shutdown ordering for the webhook integration.

mod coordinator;
mod host;
mod shutdown;
mod stop;

pub use coordinator::{DEFAULT_DEREGISTER_TIMEOUT_SECS, LifecycleCoordinator, WebhookSetup};
pub use host::{AxumHost, ListenerHost};
pub use shutdown::ShutdownHook;
pub use stop::StopSignal;
