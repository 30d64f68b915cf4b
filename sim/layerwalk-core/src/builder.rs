//! Encapsulation: wrapping a message in one header per layer on its way down
//! the stack.
//!
//! Layers are always attached in the same order:
//!
//! ```text
//! Application   the raw message
//! TLS/SSL       TCP only, payload becomes "[ENCRYPTED]:<message>"
//! Transport     TCP 12345 > 80, UDP 12345 > 53, or ICMP (which drops the payload)
//! Network       network addresses
//! Data Link     link addresses
//! ```
//!
//! Along with the [`Frame`], the builder returns the trace of what each layer
//! contributed, Application first.

use crate::{
    address::BROADCAST_LINK,
    frame::{
        EthernetHeader, Frame, Header, IcmpHeader, NetworkHeader, TcpHeader, UdpHeader,
        CLIENT_PORT, DNS_PORT,
    },
    layer::{Layer, LayerHeader},
    logging,
    protocol::{TransportProtocol, UnsupportedProtocolError},
};

/// The prefix the TLS layer puts in front of a TCP payload. The reader uses it
/// to tell that a payload was encrypted.
pub const TLS_MARKER: &str = "[ENCRYPTED]:";

const DEFAULT_SRC_LINK: &str = "00:00:00:00:00:00";
const DEFAULT_SRC_NET: &str = "192.168.1.100";
const DEFAULT_DST_NET: &str = "192.168.1.1";

/// Composes frames for one protocol and set of addresses.
///
/// ```
/// # use layerwalk_core::{builder::FrameBuilder, protocol::TransportProtocol, layer::Layer};
/// let (frame, trace) = FrameBuilder::new(TransportProtocol::Udp)
///     .link("00:11:22:33:44:01", "00:11:22:33:44:02")
///     .network("192.168.1.100", "192.168.1.10")
///     .build("Hello");
/// assert_eq!(trace.first().map(|entry| entry.layer), Some(Layer::Application));
/// assert_eq!(frame.payload(), b"Hello");
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    protocol: TransportProtocol,
    src_link: String,
    dst_link: String,
    src_net: String,
    dst_net: String,
    tcp: TcpHeader,
    icmp: IcmpHeader,
}

impl FrameBuilder {
    /// Creates a builder with default addresses and transport headers.
    pub fn new(protocol: TransportProtocol) -> Self {
        Self {
            protocol,
            src_link: DEFAULT_SRC_LINK.into(),
            dst_link: BROADCAST_LINK.into(),
            src_net: DEFAULT_SRC_NET.into(),
            dst_net: DEFAULT_DST_NET.into(),
            tcp: TcpHeader::default(),
            icmp: IcmpHeader::default(),
        }
    }

    /// Set the source and destination link addresses
    pub fn link(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.src_link = source.into();
        self.dst_link = destination.into();
        self
    }

    /// Set the source and destination network addresses
    pub fn network(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.src_net = source.into();
        self.dst_net = destination.into();
        self
    }

    /// Set the TCP header used when the protocol is TCP
    pub fn tcp_header(mut self, header: TcpHeader) -> Self {
        self.tcp = header;
        self
    }

    /// Set the ICMP header used when the protocol is ICMP
    pub fn icmp_header(mut self, header: IcmpHeader) -> Self {
        self.icmp = header;
        self
    }

    /// Wraps the payload in every layer and returns the frame along with its
    /// layer-ascending trace. Building has no side effects beyond logging, so
    /// the same builder and payload always yield equal results.
    pub fn build(&self, payload: &str) -> (Frame, Vec<LayerHeader>) {
        let mut trace = Vec::with_capacity(Layer::ASCENDING.len());
        trace.push(LayerHeader::bare(Layer::Application, payload));

        let mut visible = payload.to_string();
        if self.protocol.encrypts() {
            visible = format!("{TLS_MARKER}{visible}");
            trace.push(LayerHeader::bare(Layer::Tls, visible.clone()));
        }

        let transport = match self.protocol {
            TransportProtocol::Tcp => Header::Tcp(self.tcp),
            TransportProtocol::Udp => {
                Header::Udp(UdpHeader::new(CLIENT_PORT, DNS_PORT, visible.len()))
            }
            TransportProtocol::Icmp => {
                visible.clear();
                Header::Icmp(self.icmp)
            }
        };
        let network = Header::Network(NetworkHeader::new(
            self.src_net.clone(),
            self.dst_net.clone(),
            self.protocol,
        ));
        let link = Header::Ethernet(EthernetHeader::new(
            self.src_link.clone(),
            self.dst_link.clone(),
        ));

        let mut frame = Frame::bare(visible.clone().into_bytes());
        for (layer, header) in [
            (Layer::Transport, transport),
            (Layer::Network, network),
            (Layer::DataLink, link),
        ] {
            trace.push(LayerHeader::with_summary(
                layer,
                header.to_string(),
                visible.clone(),
            ));
            frame = frame.wrap(header);
        }

        logging::frame_built(self.protocol, &self.src_net, &self.dst_net, &trace);
        (frame, trace)
    }
}

/// Builds a frame from a protocol name, as requested by a user.
///
/// Fails with [`UnsupportedProtocolError`] for anything other than `TCP`,
/// `UDP`, or `ICMP`.
pub fn build(
    payload: &str,
    protocol: &str,
    src_link: &str,
    dst_link: &str,
    src_net: &str,
    dst_net: &str,
) -> Result<(Frame, Vec<LayerHeader>), UnsupportedProtocolError> {
    let protocol: TransportProtocol = protocol.parse()?;
    Ok(FrameBuilder::new(protocol)
        .link(src_link, dst_link)
        .network(src_net, dst_net)
        .build(payload))
}
