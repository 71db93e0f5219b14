use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

use crate::api;
use crate::http::{HttpError, read_request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub max_body_bytes: usize,
    /// Time a client gets to send its whole request.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            max_body_bytes: 64 * 1024,
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// Accept connections forever, serving each on its own task.
///
/// Only fails if accepting on the listener fails.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> std::io::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, peer, config).await {
                debug!("{peer}: {err}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    config: ServerConfig,
) -> Result<(), HttpError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let read = time::timeout(
        config.read_timeout,
        read_request(&mut reader, config.max_body_bytes),
    )
    .await
    .unwrap_or_else(|_| Err(HttpError::TimedOut(config.read_timeout)));

    let response = match read {
        Ok(request) => {
            info!("{peer}: {} {}", request.method, request.path);
            api::handle(&request)
        }
        Err(err) => match err.response() {
            Some(response) => {
                warn!("{peer}: {err}");
                response
            }
            None => return Err(err),
        },
    };

    debug!("{peer}: responding {}", response.status.as_u16());
    response.write_to(&mut write_half).await?;
    Ok(())
}
