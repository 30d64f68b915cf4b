use crate::protocol::TransportProtocol;
use std::fmt::{self, Display};

/// The time to live given to every simulated packet.
pub const DEFAULT_TTL: u8 = 64;

/// The network (IP) header of a frame. Addresses are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkHeader {
    /// The source address
    pub source: String,
    /// The destination address
    pub destination: String,
    /// Indicates the next level protocol in the data portion of the datagram
    pub protocol: TransportProtocol,
    /// The number of remaining hops this datagram can take before being removed
    pub time_to_live: u8,
}

impl NetworkHeader {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        protocol: TransportProtocol,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            protocol,
            time_to_live: DEFAULT_TTL,
        }
    }
}

impl Display for NetworkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IP {} > {} proto={} ttl={}",
            self.source,
            self.destination,
            self.protocol.keyword(),
            self.time_to_live
        )
    }
}
