pub mod proto;
pub mod tcp;
pub mod transport;
pub mod udp;

pub use tcp::TcpTransport;
pub use transport::{Transport, TransportEnum};
pub use udp::UdpTransport;
