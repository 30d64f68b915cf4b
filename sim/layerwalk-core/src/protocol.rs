//! The transport protocols a frame can be built with.

use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// A protocol the frame builder knows how to put at the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Tcp,
    Udp,
    Icmp,
}

impl TransportProtocol {
    /// The lowercase name used in network header summaries.
    pub const fn keyword(self) -> &'static str {
        match self {
            TransportProtocol::Tcp => "tcp",
            TransportProtocol::Udp => "udp",
            TransportProtocol::Icmp => "icmp",
        }
    }

    /// Whether payloads sent with this protocol are wrapped by the TLS layer.
    pub const fn encrypts(self) -> bool {
        matches!(self, TransportProtocol::Tcp)
    }
}

impl Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportProtocol::Tcp => "TCP",
            TransportProtocol::Udp => "UDP",
            TransportProtocol::Icmp => "ICMP",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TransportProtocol {
    type Err = UnsupportedProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TCP" => Ok(TransportProtocol::Tcp),
            "UDP" => Ok(TransportProtocol::Udp),
            "ICMP" => Ok(TransportProtocol::Icmp),
            other => Err(UnsupportedProtocolError {
                protocol: other.to_string(),
            }),
        }
    }
}

/// Raised when a frame or exchange is requested for a protocol outside TCP,
/// UDP, and ICMP.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
#[error("unsupported protocol \"{protocol}\"")]
pub struct UnsupportedProtocolError {
    /// The protocol name that was requested
    pub protocol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_protocols() {
        assert_eq!("TCP".parse(), Ok(TransportProtocol::Tcp));
        assert_eq!("UDP".parse(), Ok(TransportProtocol::Udp));
        assert_eq!("ICMP".parse(), Ok(TransportProtocol::Icmp));
    }

    #[test]
    fn rejects_others() {
        let err = "SCTP".parse::<TransportProtocol>().unwrap_err();
        assert_eq!(err.protocol, "SCTP");
        assert_eq!(err.to_string(), "unsupported protocol \"SCTP\"");
        // Names are matched exactly
        assert!("tcp".parse::<TransportProtocol>().is_err());
    }

    #[test]
    fn only_tcp_is_encrypted() {
        assert!(TransportProtocol::Tcp.encrypts());
        assert!(!TransportProtocol::Udp.encrypts());
        assert!(!TransportProtocol::Icmp.encrypts());
    }
}
