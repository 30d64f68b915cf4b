//! Composed frames: a stack of protocol headers wrapped around a payload.
//!
//! A [`Frame`] is produced by the [builder](crate::builder) and inspected by
//! the [reader](crate::read_frame). Once built it never changes; operations that
//! alter a frame, such as a router rewriting link addresses, return a new one.
//! Cloning is cheap because the payload bytes are shared.

use crate::layer::Layer;
use std::{
    collections::VecDeque,
    fmt::{self, Display},
    sync::Arc,
};

mod ethernet;
pub use ethernet::{EthernetHeader, ETHER_TYPE_IPV4};

mod network;
pub use network::{NetworkHeader, DEFAULT_TTL};

mod tcp;
pub use tcp::{Control, TcpHeader, TcpHeaderBuilder, CLIENT_PORT, HTTP_PORT};

mod udp;
pub use udp::{UdpHeader, DNS_PORT};

mod icmp;
pub use icmp::{IcmpHeader, IcmpKind};

/// A single protocol header within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Header {
    Ethernet(EthernetHeader),
    Network(NetworkHeader),
    Tcp(TcpHeader),
    Udp(UdpHeader),
    Icmp(IcmpHeader),
}

impl Header {
    /// The layer this header belongs to.
    pub fn layer(&self) -> Layer {
        match self {
            Header::Ethernet(_) => Layer::DataLink,
            Header::Network(_) => Layer::Network,
            Header::Tcp(_) | Header::Udp(_) | Header::Icmp(_) => Layer::Transport,
        }
    }

    /// Whether anything is carried inside this header. ICMP messages in the
    /// simulation carry nothing.
    pub fn carries_payload(&self) -> bool {
        !matches!(self, Header::Icmp(_))
    }

    /// The short scapy-style name of the header.
    pub fn name(&self) -> &'static str {
        match self {
            Header::Ethernet(_) => "Ether",
            Header::Network(_) => "IP",
            Header::Tcp(_) => "TCP",
            Header::Udp(_) => "UDP",
            Header::Icmp(_) => "ICMP",
        }
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::Ethernet(header) => header.fmt(f),
            Header::Network(header) => header.fmt(f),
            Header::Tcp(header) => header.fmt(f),
            Header::Udp(header) => header.fmt(f),
            Header::Icmp(header) => header.fmt(f),
        }
    }
}

/// A fully layered network unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Outermost header first
    headers: VecDeque<Header>,
    payload: Arc<Vec<u8>>,
}

impl Frame {
    /// Assembles a frame from headers given outermost first and the innermost
    /// payload. No layering rules are checked, which lets callers inspect
    /// frames with missing or unusual layers.
    pub fn from_parts(headers: impl IntoIterator<Item = Header>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: headers.into_iter().collect(),
            payload: Arc::new(payload.into()),
        }
    }

    /// A frame holding only a payload, ready to be wrapped.
    pub(crate) fn bare(payload: Vec<u8>) -> Self {
        Self {
            headers: VecDeque::new(),
            payload: Arc::new(payload),
        }
    }

    /// Wraps the frame in an outer header.
    pub(crate) fn wrap(mut self, header: Header) -> Self {
        self.headers.push_front(header);
        self
    }

    /// The headers from the outside in.
    pub fn headers(&self) -> impl Iterator<Item = &Header> + '_ {
        self.headers.iter()
    }

    /// The number of headers in the frame.
    pub fn depth(&self) -> usize {
        self.headers.len()
    }

    /// The innermost bytes of the frame.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as text, replacing invalid UTF-8.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// The outermost header of the given layer, if any.
    pub fn header(&self, layer: Layer) -> Option<&Header> {
        self.headers.iter().find(|header| header.layer() == layer)
    }

    pub fn link(&self) -> Option<&EthernetHeader> {
        self.headers.iter().find_map(|header| match header {
            Header::Ethernet(ethernet) => Some(ethernet),
            _ => None,
        })
    }

    pub fn network(&self) -> Option<&NetworkHeader> {
        self.headers.iter().find_map(|header| match header {
            Header::Network(network) => Some(network),
            _ => None,
        })
    }

    pub fn transport(&self) -> Option<&Header> {
        self.header(Layer::Transport)
    }

    pub fn tcp(&self) -> Option<&TcpHeader> {
        match self.transport()? {
            Header::Tcp(tcp) => Some(tcp),
            _ => None,
        }
    }

    pub fn udp(&self) -> Option<&UdpHeader> {
        match self.transport()? {
            Header::Udp(udp) => Some(udp),
            _ => None,
        }
    }

    pub fn icmp(&self) -> Option<&IcmpHeader> {
        match self.transport()? {
            Header::Icmp(icmp) => Some(icmp),
            _ => None,
        }
    }

    /// A copy of this frame with every header of the given layer removed.
    pub fn without(&self, layer: Layer) -> Self {
        Self {
            headers: self
                .headers
                .iter()
                .filter(|header| header.layer() != layer)
                .cloned()
                .collect(),
            payload: self.payload.clone(),
        }
    }

    /// A copy of this frame with new link addresses. A frame without a data
    /// link header gains one.
    pub fn with_link_addresses(&self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        let ethernet = EthernetHeader::new(source, destination);
        let mut headers = self.headers.clone();
        match headers.iter_mut().find(|header| header.layer() == Layer::DataLink) {
            Some(existing) => *existing = Header::Ethernet(ethernet),
            None => headers.push_front(Header::Ethernet(ethernet)),
        }
        Self {
            headers,
            payload: self.payload.clone(),
        }
    }
}

/// Writes the layer names, e.g. `Ether / IP / TCP / Raw`.
impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for header in self.headers.iter() {
            if wrote {
                write!(f, " / ")?;
            }
            wrote = true;
            write!(f, "{}", header.name())?;
        }
        if !self.payload.is_empty() {
            if wrote {
                write!(f, " / ")?;
            }
            write!(f, "Raw")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TransportProtocol;

    fn sample() -> Frame {
        Frame::bare(b"hello".to_vec())
            .wrap(Header::Udp(UdpHeader::new(CLIENT_PORT, DNS_PORT, 5)))
            .wrap(Header::Network(NetworkHeader::new(
                "10.0.0.1",
                "10.0.0.2",
                TransportProtocol::Udp,
            )))
            .wrap(Header::Ethernet(EthernetHeader::new("aa", "bb")))
    }

    #[test]
    fn wrapping_puts_headers_outside() {
        let frame = sample();
        let layers: Vec<_> = frame.headers().map(Header::layer).collect();
        assert_eq!(layers, [Layer::DataLink, Layer::Network, Layer::Transport]);
        assert_eq!(frame.to_string(), "Ether / IP / UDP / Raw");
        assert_eq!(frame.payload_text(), "hello");
        assert!(frame.udp().is_some());
        assert!(frame.tcp().is_none());
    }

    #[test]
    fn without_leaves_original_untouched() {
        let frame = sample();
        let stripped = frame.without(Layer::Transport);
        assert_eq!(stripped.depth(), 2);
        assert!(stripped.transport().is_none());
        assert_eq!(frame.depth(), 3);
        assert_eq!(stripped.payload(), frame.payload());
    }

    #[test]
    fn rewrites_link_addresses() {
        let frame = sample();
        let rewritten = frame.with_link_addresses("cc", "dd");
        let link = rewritten.link().unwrap();
        assert_eq!((link.source.as_str(), link.destination.as_str()), ("cc", "dd"));
        assert_eq!(frame.link().unwrap().source, "aa");

        let added = frame.without(Layer::DataLink).with_link_addresses("ee", "ff");
        assert_eq!(added.depth(), 3);
        assert_eq!(added.headers().next().map(Header::layer), Some(Layer::DataLink));
    }
}
