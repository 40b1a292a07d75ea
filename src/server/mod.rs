//! TCP listener and per-connection request handling.

pub mod listener;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::http::request::Request;

/// Failure reported by a handler instead of a response body.
///
/// The server turns it into a minimal error response with the given status
/// code and the message as a `text/plain` body.
#[derive(Debug, Clone)]
pub struct HandlerError {
    pub message: String,
    pub status_code: u16,
}

impl HandlerError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

/// Application callback invoked once per connection with the completed
/// request. The handler writes its response body into the buffer; the server
/// wraps it in a status line and default headers.
pub type Handler = Arc<dyn Fn(&mut Vec<u8>, &Request) -> Result<(), HandlerError> + Send + Sync>;

/// A running HTTP server: a bound listener with an accept loop spawned in the
/// background, one task per accepted connection.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `addr` and starts accepting connections.
    pub async fn serve(addr: &str, handler: Handler) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("listening on {local_addr}");

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(listener::run(
            listener,
            handler,
            closed.clone(),
            shutdown.clone(),
        ));

        Ok(Self {
            local_addr,
            closed,
            shutdown,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    /// Connections already being handled are left to finish on their own.
    pub async fn close(self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
        let _ = self.accept_task.await;
        info!("server closed");
    }
}
