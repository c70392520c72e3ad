//! HTTP listener driven by the lifecycle orchestrator.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use chatd_core::lifecycle::Listener;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::net::TcpListener;
use tracing::info;

/// A bound TCP socket plus the router that serves it.
pub struct HttpListener {
    listener: TcpListener,
    router: Router,
}

impl HttpListener {
    pub async fn bind(addr: &str, router: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Listener for HttpListener {
    fn name(&self) -> &str {
        "http"
    }

    fn listen(self: Box<Self>) -> BoxFuture<'static, anyhow::Result<()>> {
        async move {
            let HttpListener { listener, router } = *self;
            info!("http listener serving");
            axum::serve(listener, router).await?;
            Ok(())
        }
        .boxed()
    }
}
