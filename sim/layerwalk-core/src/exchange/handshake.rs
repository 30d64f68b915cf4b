use super::{control_frame, EventKind, ExchangeEvent, Steps};
use crate::{
    address::AddressIdentity,
    builder::FrameBuilder,
    frame::{TcpHeaderBuilder, CLIENT_PORT, HTTP_PORT},
    protocol::TransportProtocol,
    rng::RandomSource,
};

/// Where a handshake stands. Each transition emits one segment.
///
/// ```text
/// Start --SYN--> SynSent --SYN,ACK--> SynAckSent --ACK--> AckSent
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeState {
    Start,
    /// The client sent its initial sequence number.
    SynSent,
    /// The server acknowledged it and sent its own.
    SynAckSent,
    /// The client acknowledged the server. Terminal.
    AckSent,
}

/// The TCP three-way handshake between a client and a server.
///
/// The client's initial sequence number is chosen by the caller. The server's
/// is drawn from the random source over the full `u32` range, so tests should
/// use a scripted source to pin it. Sequence arithmetic wraps.
#[derive(Debug, Clone)]
pub struct Handshake<'a> {
    state: HandshakeState,
    client: &'a AddressIdentity,
    server: &'a AddressIdentity,
    link_destination: &'a str,
    client_isn: u32,
    server_isn: u32,
}

impl<'a> Handshake<'a> {
    pub fn new(
        client: &'a AddressIdentity,
        server: &'a AddressIdentity,
        link_destination: &'a str,
        client_isn: u32,
    ) -> Self {
        Self {
            state: HandshakeState::Start,
            client,
            server,
            link_destination,
            client_isn,
            server_isn: 0,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }
}

impl Steps for Handshake<'_> {
    fn advance(&mut self, rng: &mut dyn RandomSource) -> Option<ExchangeEvent> {
        let tcp = FrameBuilder::new(TransportProtocol::Tcp);
        match self.state {
            HandshakeState::Start => {
                let syn = TcpHeaderBuilder::new(CLIENT_PORT, HTTP_PORT, self.client_isn)
                    .syn()
                    .build();
                let built = control_frame(
                    tcp.tcp_header(syn),
                    self.client,
                    self.server,
                    self.link_destination,
                );
                self.state = HandshakeState::SynSent;
                Some(ExchangeEvent::delivered(
                    EventKind::SynSent,
                    self.client,
                    self.server,
                    built,
                ))
            }

            HandshakeState::SynSent => {
                self.server_isn = rng.next_u32();
                let syn_ack = TcpHeaderBuilder::new(HTTP_PORT, CLIENT_PORT, self.server_isn)
                    .syn()
                    .ack(self.client_isn.wrapping_add(1))
                    .build();
                let built = control_frame(
                    tcp.tcp_header(syn_ack),
                    self.server,
                    self.client,
                    self.link_destination,
                );
                self.state = HandshakeState::SynAckSent;
                Some(ExchangeEvent::delivered(
                    EventKind::SynAckSent,
                    self.server,
                    self.client,
                    built,
                ))
            }

            HandshakeState::SynAckSent => {
                let ack =
                    TcpHeaderBuilder::new(CLIENT_PORT, HTTP_PORT, self.client_isn.wrapping_add(1))
                        .ack(self.server_isn.wrapping_add(1))
                        .build();
                let built = control_frame(
                    tcp.tcp_header(ack),
                    self.client,
                    self.server,
                    self.link_destination,
                );
                self.state = HandshakeState::AckSent;
                Some(ExchangeEvent::delivered(
                    EventKind::AckSent,
                    self.client,
                    self.server,
                    built,
                ))
            }

            HandshakeState::AckSent => None,
        }
    }
}
