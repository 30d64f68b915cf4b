use std::fmt::{self, Display};

/// The EtherType for an IPv4 payload.
pub const ETHER_TYPE_IPV4: u16 = 0x0800;

/// The data link (Ethernet) header of a frame. Addresses are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EthernetHeader {
    pub source: String,
    pub destination: String,
    pub ether_type: u16,
}

impl EthernetHeader {
    /// Creates a header for an IPv4 payload.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ether_type: ETHER_TYPE_IPV4,
        }
    }
}

impl Display for EthernetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ether {} > {} type=", self.source, self.destination)?;
        match self.ether_type {
            ETHER_TYPE_IPV4 => write!(f, "IPv4"),
            other => write!(f, "{other:#06x}"),
        }
    }
}
