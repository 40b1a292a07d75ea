use std::sync::Arc;

use minihttp::config::Config;
use minihttp::http::request::Request;
use minihttp::server::{HandlerError, Server};

fn demo_handler(body: &mut Vec<u8>, req: &Request) -> Result<(), HandlerError> {
    match req.target.as_str() {
        "/yourproblem" => Err(HandlerError::new(400, "Your problem is not my problem\n")),
        "/myproblem" => Err(HandlerError::new(500, "Woopsie, my bad\n")),
        _ => {
            body.extend_from_slice(b"All good, frfr\n");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let server = Server::serve(&cfg.listen_addr, Arc::new(demo_handler)).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    server.close().await;

    Ok(())
}
