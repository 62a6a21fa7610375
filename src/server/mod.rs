//! HTTP server exposing the recipe book.
//!
//! One hyper HTTP/1 connection task per client; all of them share a
//! [`RecipeService`] whose store serialises document access.

mod routes;

pub use routes::handle;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::RecipeService;
use crate::config::ServerConfig;
use crate::storage::RecordStore;

/// How long open connections get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A server running in a background task.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl ServerHandle {
    /// Base URL clients should use, e.g. `http://127.0.0.1:5000`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight ones to drain.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.context("server task panicked")?
    }
}

/// Open the store, bind the listener and serve in the background.
///
/// The document is loaded once up front so a malformed file stops startup
/// instead of failing every request.
pub async fn start_server(config: &ServerConfig) -> anyhow::Result<ServerHandle> {
    let store = RecordStore::open(&config.data_file);
    let doc = store
        .load()
        .await
        .with_context(|| format!("loading {:?}", config.data_file))?;
    tracing::info!(
        "Recipe book at {:?}: {} shooters, {} ingredients",
        store.path(),
        doc.shooters.len(),
        doc.ingredients.len()
    );

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let addr = listener.local_addr()?;
    tracing::info!("Server running on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let api = RecipeService::new(store);
    let task = tokio::spawn(async move {
        serve(listener, api, async {
            let _ = shutdown_rx.await;
        })
        .await
    });

    Ok(ServerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        task,
    })
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, api: RecipeService, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                        continue;
                    }
                };
                tracing::debug!("Connection from {}", peer_addr);
                let api = api.clone();
                let service = service_fn(move |req| {
                    let api = api.clone();
                    async move { Ok::<_, Infallible>(handle(api, req).await) }
                });
                let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                let conn = graceful.watch(conn);
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!("Connection from {} closed: {}", peer_addr, e);
                    }
                });
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }

    drop(listener);
    tokio::select! {
        _ = graceful.shutdown() => tracing::info!("Server stopped"),
        _ = tokio::time::sleep(SHUTDOWN_GRACE) => {
            tracing::warn!("Timed out waiting for connections to close");
        }
    }
    Ok(())
}
