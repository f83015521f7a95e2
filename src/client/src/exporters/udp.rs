use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use crate::destination::Destination;
use crate::error::{ForwarderError, Result};
use crate::exporters::proto::{encode_msg, Msg};
use crate::exporters::transport::Transport;

/// Largest datagram we hand to the socket.
pub const MAX_DATAGRAM_SIZE: usize = 16 * 1024;

/// Datagram transport: one message per datagram, no acknowledgement.
#[derive(Default)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for UdpTransport {
    async fn connect(&mut self, destination: &Destination) -> Result<()> {
        let address = destination.address();
        let connection_failure =
            |e: std::io::Error| ForwarderError::ConnectionFailure(format!("{address}: {e}"));

        let remote = lookup_host(&address)
            .await
            .map_err(connection_failure)?
            .next()
            .ok_or_else(|| {
                ForwarderError::ConnectionFailure(format!("{address}: no address resolved"))
            })?;

        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await.map_err(connection_failure)?;
        socket.connect(remote).await.map_err(connection_failure)?;

        debug!("Connected to {} over udp", remote);
        self.socket = Some(socket);
        Ok(())
    }

    async fn send(&mut self, msg: &Msg) -> Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| ForwarderError::ConnectionFailure("not connected".to_string()))?;

        let payload = encode_msg(msg);
        if payload.len() > MAX_DATAGRAM_SIZE {
            return Err(ForwarderError::delivery(format!(
                "message of {} bytes exceeds the {MAX_DATAGRAM_SIZE} byte datagram limit",
                payload.len()
            )));
        }

        let sent = socket
            .send(&payload)
            .await
            .map_err(|e| ForwarderError::delivery(e.to_string()))?;
        if sent != payload.len() {
            return Err(ForwarderError::delivery(format!(
                "short datagram write: {sent} of {} bytes",
                payload.len()
            )));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        self.socket = None;
        Ok(())
    }
}
