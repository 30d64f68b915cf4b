use std::fmt::{self, Display};

/// The number of bytes in a UDP header
pub const HEADER_OCTETS: u16 = 8;

/// The destination port of UDP datagrams.
pub const DNS_PORT: u16 = 53;

/// Represents a UDP header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UdpHeader {
    /// The source port
    pub source: u16,
    /// The destination port
    pub destination: u16,
    /// The length of the UDP packet in bytes, including the header
    pub length: u16,
}

impl UdpHeader {
    /// Creates a header for a payload of the given length. Lengths that do not
    /// fit the 16-bit field saturate.
    pub fn new(source: u16, destination: u16, payload_len: usize) -> Self {
        let length = u16::try_from(payload_len)
            .unwrap_or(u16::MAX)
            .saturating_add(HEADER_OCTETS);
        Self {
            source,
            destination,
            length,
        }
    }
}

impl Display for UdpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UDP {} > {} len={}",
            self.source, self.destination, self.length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_includes_header() {
        let header = UdpHeader::new(12345, DNS_PORT, 13);
        assert_eq!(header.length, 21);
        assert_eq!(header.to_string(), "UDP 12345 > 53 len=21");
    }

    #[test]
    fn oversized_payload_saturates() {
        assert_eq!(UdpHeader::new(1, 2, 1 << 20).length, u16::MAX);
    }
}
