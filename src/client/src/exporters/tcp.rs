use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::destination::Destination;
use crate::error::{ForwarderError, Result};
use crate::exporters::proto::{decode_msg, frame, Msg};
use crate::exporters::transport::Transport;

/// Upper bound on an acknowledgement we are willing to buffer.
const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Stream transport: every message is length-prefixed and acknowledged by the server.
#[derive(Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn exchange(stream: &mut TcpStream, msg: &Msg) -> Result<Msg> {
        stream.write_all(&frame(msg)).await?;
        stream.flush().await?;

        let len = stream.read_u32().await? as usize;
        if len > MAX_RESPONSE_SIZE {
            return Err(ForwarderError::delivery(format!(
                "server response of {len} bytes exceeds {MAX_RESPONSE_SIZE}"
            )));
        }

        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).await?;
        Ok(decode_msg(&buf)?)
    }
}

impl Transport for TcpTransport {
    async fn connect(&mut self, destination: &Destination) -> Result<()> {
        let address = destination.address();
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|e| ForwarderError::ConnectionFailure(format!("{address}: {e}")))?;
        stream
            .set_nodelay(true)
            .map_err(|e| ForwarderError::ConnectionFailure(format!("{address}: {e}")))?;

        debug!("Connected to {} over tcp", address);
        self.stream = Some(stream);
        Ok(())
    }

    async fn send(&mut self, msg: &Msg) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ForwarderError::ConnectionFailure("not connected".to_string()))?;

        match Self::exchange(stream, msg).await {
            Ok(response) if response.is_ok() => Ok(()),
            Ok(response) => Err(ForwarderError::delivery(
                response
                    .error
                    .unwrap_or_else(|| "server rejected message".to_string()),
            )),
            Err(err) => {
                // the stream is in an unknown state, the next publish reconnects
                self.stream = None;
                Err(match err {
                    ForwarderError::Io(e) => ForwarderError::delivery(e.to_string()),
                    ForwarderError::Decode(e) => ForwarderError::delivery(e.to_string()),
                    other => other,
                })
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
        }
        Ok(())
    }
}
