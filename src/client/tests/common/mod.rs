use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use forwarder_client::exporters::proto::{decode_msg, frame, EventProto, Msg};
use forwarder_common::{Metadata, Sample};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::mpsc;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
pub enum ServerMode {
    /// acknowledge everything except events whose service matches
    RejectService(&'static str),
    /// read one message per connection, then hang up without replying
    HangUp,
}

/// Minimal stand-in for the event-index server on a local TCP port.
pub struct FakeTcpServer {
    pub addr: SocketAddr,
    pub events: mpsc::UnboundedReceiver<EventProto>,
    connections: Arc<AtomicUsize>,
}

impl FakeTcpServer {
    pub async fn start(mode: ServerMode) -> Self {
        Self::start_on(0, mode).await
    }

    pub async fn start_on(port: u16, mode: ServerMode) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, events) = mpsc::unbounded_channel();
        let connections = Arc::new(AtomicUsize::new(0));

        let accepted = connections.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                accepted.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve(stream, tx.clone(), mode));
            }
        });

        FakeTcpServer {
            addr,
            events,
            connections,
        }
    }

    pub fn url(&self) -> String {
        format!("riemann://{}?transport=tcp", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub async fn next_event(&mut self) -> EventProto {
        tokio::time::timeout(RECV_TIMEOUT, self.events.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("server stopped")
    }

    pub fn assert_no_more_events(&mut self) {
        assert!(self.events.try_recv().is_err(), "unexpected extra event");
    }
}

async fn serve(mut stream: TcpStream, tx: mpsc::UnboundedSender<EventProto>, mode: ServerMode) {
    loop {
        let Ok(len) = stream.read_u32().await else {
            return;
        };
        let mut buf = vec![0u8; len as usize];
        if stream.read_exact(&mut buf).await.is_err() {
            return;
        }
        let msg = decode_msg(&buf).unwrap();

        let mut reply = Msg::acknowledgement();
        for event in msg.events {
            if let ServerMode::RejectService(service) = mode {
                if event.service.as_deref() == Some(service) {
                    reply = Msg::rejection(format!("refusing {service}"));
                }
            }
            tx.send(event).unwrap();
        }

        match mode {
            ServerMode::HangUp => return,
            ServerMode::RejectService(_) => {
                if stream.write_all(&frame(&reply)).await.is_err() {
                    return;
                }
            }
        }
    }
}

pub struct FakeUdpServer {
    socket: UdpSocket,
}

impl FakeUdpServer {
    pub async fn start() -> Self {
        FakeUdpServer {
            socket: UdpSocket::bind("127.0.0.1:0").await.unwrap(),
        }
    }

    pub fn url(&self) -> String {
        format!("riemann://{}?transport=udp", self.socket.local_addr().unwrap())
    }

    pub async fn next_msg(&self) -> Msg {
        let mut buf = vec![0u8; 65536];
        let len = tokio::time::timeout(RECV_TIMEOUT, self.socket.recv(&mut buf))
            .await
            .expect("timed out waiting for a datagram")
            .unwrap();
        decode_msg(&buf[..len]).unwrap()
    }
}

pub fn sample(name: &str, volume: f64, metadata: Value) -> Sample {
    let metadata: Metadata = metadata.as_object().cloned().unwrap_or_default();
    Sample::new(name, volume).with_metadata(metadata)
}

/// Port that nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
