use crate::destination::{Destination, TransportKind};
use crate::error::Result;
use crate::exporters::proto::Msg;
use crate::exporters::tcp::TcpTransport;
use crate::exporters::udp::UdpTransport;

/// Delivery mechanism shared by the stream and datagram implementations.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn connect(&mut self, destination: &Destination) -> Result<()>;

    async fn send(&mut self, msg: &Msg) -> Result<()>;

    fn is_connected(&self) -> bool;

    async fn close(&mut self) -> Result<()>;
}

pub enum TransportEnum {
    Stream(TcpTransport),
    Datagram(UdpTransport),
}

impl TransportEnum {
    pub fn for_kind(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Stream => TransportEnum::Stream(TcpTransport::new()),
            TransportKind::Datagram => TransportEnum::Datagram(UdpTransport::new()),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            TransportEnum::Stream(_) => "TcpTransport",
            TransportEnum::Datagram(_) => "UdpTransport",
        }
    }
}

impl Transport for TransportEnum {
    async fn connect(&mut self, destination: &Destination) -> Result<()> {
        match self {
            TransportEnum::Stream(transport) => transport.connect(destination).await,
            TransportEnum::Datagram(transport) => transport.connect(destination).await,
        }
    }

    async fn send(&mut self, msg: &Msg) -> Result<()> {
        match self {
            TransportEnum::Stream(transport) => transport.send(msg).await,
            TransportEnum::Datagram(transport) => transport.send(msg).await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            TransportEnum::Stream(transport) => transport.is_connected(),
            TransportEnum::Datagram(transport) => transport.is_connected(),
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            TransportEnum::Stream(transport) => transport.close().await,
            TransportEnum::Datagram(transport) => transport.close().await,
        }
    }
}
