use std::fmt;
use std::str::FromStr;

use forwarder_common::constants::TRANSPORT_QUERY_KEY;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::config_manager::PublisherDefaults;
use crate::error::{ForwarderError, Result};

/// Network mechanism used to reach the event-index server.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// tcp, acknowledged per message
    Stream,
    /// udp, fire and forget
    Datagram,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Stream => "tcp",
            TransportKind::Datagram => "udp",
        }
    }
}

impl FromStr for TransportKind {
    type Err = ForwarderError;

    fn from_str(name: &str) -> Result<Self> {
        // ssl is intentionally absent
        match name {
            "tcp" => Ok(TransportKind::Stream),
            "udp" => Ok(TransportKind::Datagram),
            other => Err(ForwarderError::invalid_configuration(format!(
                "Invalid transport type {other}"
            ))),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where events go. Fixed for the lifetime of a publisher.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Destination {
    pub host: String,
    pub port: u16,
    pub transport: TransportKind,
}

impl Destination {
    /// `host:port`, with IPv6 literals bracketed so the result can be handed to a socket.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Resolves a `scheme://host[:port][?transport=tcp|udp]` descriptor.
    ///
    /// The query may override the default transport and the authority may
    /// override the default port. Scheme and path are ignored.
    pub fn resolve(descriptor: &str, defaults: &PublisherDefaults) -> Result<Destination> {
        let url = Url::parse(descriptor).map_err(|e| {
            ForwarderError::invalid_configuration(format!(
                "unable to parse destination {descriptor}: {e}"
            ))
        })?;

        // a key may legally repeat in a query string; the first one wins
        let transport_name = url
            .query_pairs()
            .find(|(key, _)| key == TRANSPORT_QUERY_KEY)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| defaults.transport.clone());
        let transport = transport_name.parse::<TransportKind>()?;

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => String::new(),
        };
        if host.is_empty() {
            return Err(ForwarderError::invalid_configuration(format!(
                "destination {descriptor} has no host"
            )));
        }

        Ok(Destination {
            host,
            port: url
                .port()
                .or_else(|| explicit_port(descriptor))
                .unwrap_or(defaults.port),
            transport,
        })
    }
}

/// Port written in the descriptor's authority. `Url::port` hides a port equal
/// to the scheme's well-known one (`http://h:80`), but the scheme means nothing here.
fn explicit_port(descriptor: &str) -> Option<u16> {
    let (_, rest) = descriptor.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    let port = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']')?.1.strip_prefix(':')?,
        None => host_port.rsplit_once(':')?.1,
    };
    port.parse().ok()
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.transport, self.address())
    }
}
