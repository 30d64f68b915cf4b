use std::fmt::{self, Display};

/// The ICMP message types the simulation sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IcmpKind {
    EchoRequest,
    EchoReply,
}

impl Display for IcmpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcmpKind::EchoRequest => write!(f, "echo-request"),
            IcmpKind::EchoReply => write!(f, "echo-reply"),
        }
    }
}

/// An ICMP echo header. ICMP has no ports and, in this simulation, carries no
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IcmpHeader {
    pub kind: IcmpKind,
    /// Matches a reply to its request
    pub identifier: u16,
    /// Distinguishes successive requests with the same identifier
    pub sequence: u16,
}

impl IcmpHeader {
    /// An echo request with the given identifier and sequence.
    pub const fn echo_request(identifier: u16, sequence: u16) -> Self {
        Self {
            kind: IcmpKind::EchoRequest,
            identifier,
            sequence,
        }
    }

    /// The reply to this header, carrying back the same identifier and
    /// sequence.
    pub const fn reply(self) -> Self {
        Self {
            kind: IcmpKind::EchoReply,
            identifier: self.identifier,
            sequence: self.sequence,
        }
    }
}

impl Default for IcmpHeader {
    fn default() -> Self {
        Self::echo_request(0, 0)
    }
}

impl Display for IcmpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ICMP {} id={:#06x} seq={}",
            self.kind, self.identifier, self.sequence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_mirrors_request() {
        let request = IcmpHeader::echo_request(0xbeef, 7);
        let reply = request.reply();
        assert_eq!(reply.kind, IcmpKind::EchoReply);
        assert_eq!(reply.identifier, 0xbeef);
        assert_eq!(reply.sequence, 7);
        assert_eq!(request.to_string(), "ICMP echo-request id=0xbeef seq=7");
        assert_eq!(reply.to_string(), "ICMP echo-reply id=0xbeef seq=7");
    }
}
