//! Test-only fakes for integration tests.
//!
//! Recording implementations of the provider and dispatcher seams so tests can
//! count remote calls and observe dispatched updates.

mod dispatcher;
mod provider;

pub use dispatcher::RecordingDispatcher;
pub use provider::{ProviderCallCounts, ScriptedProvider};
