use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Result, bail};
use axum::Router;
use tokio::net::TcpListener;

/// HTTP server the webhook listener attaches to.
pub trait ListenerHost {
    /// Attach `router`, which serves `path`.
    fn mount(&mut self, path: &str, router: Router) -> Result<()>;
}

/// Axum-backed host composing mounted routers into one app.
#[derive(Default)]
pub struct AxumHost {
    router: Router,
    mounted: HashSet<String>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths mounted so far.
    pub fn is_mounted(&self, path: &str) -> bool {
        self.mounted.contains(path)
    }

    /// Composed router.
    ///
    /// The webhook handler extracts `ConnectInfo<SocketAddr>`: serve the result
    /// with `into_make_service_with_connect_info::<SocketAddr>()` (as
    /// [`Self::serve`] does) or insert `ConnectInfo` per request, otherwise every
    /// webhook call fails with 500.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves, exposing peer addresses to handlers.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    }
}

impl ListenerHost for AxumHost {
    fn mount(&mut self, path: &str, router: Router) -> Result<()> {
        if !self.mounted.insert(path.to_string()) {
            bail!("route {path} is already mounted");
        }
        let current = std::mem::take(&mut self.router);
        self.router = current.merge(router);
        Ok(())
    }
}
