use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::http::parser::request_from_reader;
use crate::http::response::StatusCode;
use crate::http::writer::{write_error_response, write_response};
use crate::server::Handler;

/// Accept loop: one spawned task per connection. Dropping the listener on
/// shutdown closes the socket; accept errors after the closed flag is set are
/// part of normal shutdown and are not reported.
pub(crate) async fn run(
    listener: TcpListener,
    handler: Handler,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("accept loop shutting down");
                return;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, peer)) => {
                        debug!("accepted connection from {peer}");
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(socket, handler).await;
                        });
                    }
                    Err(e) => {
                        if closed.load(Ordering::SeqCst) {
                            return;
                        }
                        error!("accept error: {e}");
                    }
                }
            }
        }
    }
}

/// Handles one connection: parse the request, invoke the handler, write the
/// response, close. A parse failure gets a 400 and aborts only this
/// connection; the socket is dropped (closed) on every exit path.
async fn handle_connection(mut socket: TcpStream, handler: Handler) {
    let request = match request_from_reader(&mut socket).await {
        Ok(request) => request,
        Err(e) => {
            warn!("request parse error: {e}");
            if let Err(e) = write_error_response(&mut socket, 400, "Bad Request").await {
                warn!("error writing 400 response: {e}");
            }
            return;
        }
    };

    debug!(method = %request.method, target = %request.target, "handling request");

    let mut body = Vec::new();
    let result = match handler(&mut body, &request) {
        Err(handler_error) => {
            write_error_response(&mut socket, handler_error.status_code, &handler_error.message)
                .await
        }
        Ok(()) => write_response(&mut socket, StatusCode::Ok, &body).await,
    };
    if let Err(e) = result {
        warn!("error writing response: {e}");
    }
}
