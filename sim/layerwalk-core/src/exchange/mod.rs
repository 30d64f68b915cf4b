//! Protocol exchanges as ordered lists of events.
//!
//! An exchange is generated eagerly: the caller gets every event at once and
//! can then step through them at whatever pace it likes. Each event that put a
//! frame on the wire carries that frame and the trace the builder produced for
//! it.
//!
//! Three kinds of exchange are supported:
//!
//! - [`Handshake`]: the TCP three-way handshake, always three events.
//! - [`Echo`]: an ICMP echo request and its reply, always two events.
//! - Generic: a single frame sent over an impaired link. A collision adds an
//!   advisory event before the retried frame, and the frame may be lost.
//!
//! Only the generic send passes through the [`LinkImpairment`]; handshakes
//! and echoes are delivered as-is.

use crate::{
    address::{AddressIdentity, BROADCAST_LINK},
    builder::FrameBuilder,
    frame::Frame,
    impairment::{LinkImpairment, Outcome},
    layer::LayerHeader,
    logging,
    protocol::{TransportProtocol, UnsupportedProtocolError},
    rng::RandomSource,
};
use std::fmt::{self, Display};

mod handshake;
pub use handshake::{Handshake, HandshakeState};

mod echo;
pub use echo::{Echo, EchoState};

mod generic;

/// The exchanges a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
    Handshake,
    Echo,
    Generic,
}

impl ExchangeKind {
    /// The exchange a user sending with this protocol expects to see: TCP
    /// opens a connection, ICMP pings, and anything else is a plain send.
    pub fn for_protocol(protocol: TransportProtocol) -> Self {
        match protocol {
            TransportProtocol::Tcp => ExchangeKind::Handshake,
            TransportProtocol::Icmp => ExchangeKind::Echo,
            TransportProtocol::Udp => ExchangeKind::Generic,
        }
    }
}

/// What an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SynSent,
    SynAckSent,
    AckSent,
    EchoRequestSent,
    EchoReplySent,
    PacketSent,
    PacketLost,
    /// Advisory only, no frame is attached
    CollisionDetected,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EventKind::SynSent => "SYN sent",
            EventKind::SynAckSent => "SYN-ACK sent",
            EventKind::AckSent => "ACK sent",
            EventKind::EchoRequestSent => "Echo Request sent",
            EventKind::EchoReplySent => "Echo Reply sent",
            EventKind::PacketSent => "Packet sent",
            EventKind::PacketLost => "Packet lost",
            EventKind::CollisionDetected => "Collision detected, retransmitting",
        };
        write!(f, "{text}")
    }
}

/// One step of an exchange. Events are not changed after they are created.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeEvent {
    pub kind: EventKind,
    /// The name of the sending endpoint
    pub from: String,
    /// The name of the receiving endpoint
    pub to: String,
    /// The frame put on the link, absent for advisories
    pub frame: Option<Frame>,
    /// The builder's trace of the frame, Application first. Empty for lost
    /// frames and advisories, which have nothing to display.
    pub trace: Vec<LayerHeader>,
    pub outcome: Outcome,
}

impl ExchangeEvent {
    /// A frame that reached its destination.
    pub(crate) fn delivered(
        kind: EventKind,
        from: &AddressIdentity,
        to: &AddressIdentity,
        (frame, trace): (Frame, Vec<LayerHeader>),
    ) -> Self {
        Self {
            kind,
            from: from.name().to_string(),
            to: to.name().to_string(),
            frame: Some(frame),
            trace,
            outcome: Outcome::Delivered,
        }
    }

    /// A frame that was sent but never arrived.
    pub(crate) fn lost(from: &AddressIdentity, to: &AddressIdentity, frame: Frame) -> Self {
        Self {
            kind: EventKind::PacketLost,
            from: from.name().to_string(),
            to: to.name().to_string(),
            frame: Some(frame),
            trace: Vec::new(),
            outcome: Outcome::Lost,
        }
    }

    /// Notice that a frame collided and is about to be sent again.
    pub(crate) fn collision(from: &AddressIdentity, to: &AddressIdentity) -> Self {
        Self {
            kind: EventKind::CollisionDetected,
            from: from.name().to_string(),
            to: to.name().to_string(),
            frame: None,
            trace: Vec::new(),
            outcome: Outcome::CollidedThenRetried,
        }
    }

    /// Whether the event is only a notice, with no frame to show.
    pub fn is_advisory(&self) -> bool {
        self.frame.is_none()
    }
}

/// A multi-step exchange that emits one event per step until it reaches its
/// terminal state.
pub trait Steps {
    /// Performs the next step, or returns `None` once the exchange is done.
    fn advance(&mut self, rng: &mut dyn RandomSource) -> Option<ExchangeEvent>;

    /// Runs every remaining step.
    fn drain(&mut self, rng: &mut dyn RandomSource) -> Vec<ExchangeEvent> {
        std::iter::from_fn(|| self.advance(rng)).collect()
    }
}

/// Generates exchanges with a configurable link and initial sequence number.
#[derive(Debug, Clone)]
pub struct ExchangeSimulator {
    impairment: LinkImpairment,
    initial_sequence: u32,
    link_destination: String,
    generic_destination: String,
}

impl Default for ExchangeSimulator {
    fn default() -> Self {
        Self {
            impairment: LinkImpairment::default(),
            initial_sequence: 0,
            link_destination: BROADCAST_LINK.into(),
            generic_destination: BROADCAST_LINK.into(),
        }
    }
}

impl ExchangeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the link used by generic sends
    pub fn impairment(mut self, impairment: LinkImpairment) -> Self {
        self.impairment = impairment;
        self
    }

    /// Set the client's initial sequence number for handshakes
    pub fn initial_sequence(mut self, seq: u32) -> Self {
        self.initial_sequence = seq;
        self
    }

    /// Set the destination link address of handshake and echo frames
    pub fn link_destination(mut self, link: impl Into<String>) -> Self {
        self.link_destination = link.into();
        self
    }

    /// Set the destination link address of generic sends, usually the first
    /// device on the client's link
    pub fn generic_destination(mut self, link: impl Into<String>) -> Self {
        self.generic_destination = link.into();
        self
    }

    /// Generates every event of the requested exchange.
    ///
    /// The protocol is checked first, whatever the kind, so an unsupported
    /// protocol produces no events at all. Handshakes always use TCP and
    /// echoes always use ICMP; their control frames carry no message. The
    /// generic send builds `message` with the requested protocol.
    pub fn run(
        &self,
        kind: ExchangeKind,
        message: &str,
        protocol: &str,
        client: &AddressIdentity,
        server: &AddressIdentity,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ExchangeEvent>, UnsupportedProtocolError> {
        let protocol: TransportProtocol = protocol.parse()?;
        let events = match kind {
            ExchangeKind::Handshake => Handshake::new(
                client,
                server,
                &self.link_destination,
                self.initial_sequence,
            )
            .drain(rng),
            ExchangeKind::Echo => Echo::new(client, server, &self.link_destination).drain(rng),
            ExchangeKind::Generic => {
                let builder = FrameBuilder::new(protocol)
                    .link(client.link(), self.generic_destination.as_str())
                    .network(client.network(), server.network());
                generic::send(&builder, message, client, server, &self.impairment, rng)
            }
        };
        events.iter().for_each(logging::exchange_event);
        Ok(events)
    }
}

/// Generates an exchange with the default link and an initial sequence
/// number of zero.
pub fn build_exchange(
    kind: ExchangeKind,
    message: &str,
    protocol: &str,
    client: &AddressIdentity,
    server: &AddressIdentity,
    rng: &mut dyn RandomSource,
) -> Result<Vec<ExchangeEvent>, UnsupportedProtocolError> {
    ExchangeSimulator::default().run(kind, message, protocol, client, server, rng)
}

/// Builds a control frame from one endpoint to another. Control frames carry
/// no application data.
fn control_frame(
    builder: FrameBuilder,
    from: &AddressIdentity,
    to: &AddressIdentity,
    link_destination: &str,
) -> (Frame, Vec<LayerHeader>) {
    builder
        .link(from.link(), link_destination)
        .network(from.network(), to.network())
        .build("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn endpoints() -> (AddressIdentity, AddressIdentity) {
        (
            AddressIdentity::new("Client", "192.168.1.100", "00:11:22:33:44:01").unwrap(),
            AddressIdentity::new("Server", "192.168.1.10", "00:11:22:33:44:04").unwrap(),
        )
    }

    #[test]
    fn kind_follows_protocol() {
        assert_eq!(
            ExchangeKind::for_protocol(TransportProtocol::Tcp),
            ExchangeKind::Handshake
        );
        assert_eq!(
            ExchangeKind::for_protocol(TransportProtocol::Icmp),
            ExchangeKind::Echo
        );
        assert_eq!(
            ExchangeKind::for_protocol(TransportProtocol::Udp),
            ExchangeKind::Generic
        );
    }

    #[test]
    fn unsupported_protocol_for_every_kind() {
        let (client, server) = endpoints();
        for kind in [
            ExchangeKind::Handshake,
            ExchangeKind::Echo,
            ExchangeKind::Generic,
        ] {
            let result = build_exchange(kind, "hi", "SCTP", &client, &server, &mut ScriptedRng::new());
            assert_eq!(
                result,
                Err(UnsupportedProtocolError {
                    protocol: "SCTP".into()
                })
            );
        }
    }

    #[test]
    fn generic_sends_use_their_own_destination() -> anyhow::Result<()> {
        let (client, server) = endpoints();
        let simulator = ExchangeSimulator::new()
            .impairment(LinkImpairment::disabled())
            .generic_destination("00:11:22:33:44:02");
        let destination = |kind, protocol| -> anyhow::Result<String> {
            let events = simulator.run(kind, "hi", protocol, &client, &server, &mut ScriptedRng::new())?;
            let frame = events[0].frame.as_ref().unwrap();
            assert_eq!(frame.network().unwrap().destination, "192.168.1.10");
            Ok(frame.link().unwrap().destination.clone())
        };
        assert_eq!(destination(ExchangeKind::Generic, "UDP")?, "00:11:22:33:44:02");
        assert_eq!(destination(ExchangeKind::Handshake, "TCP")?, BROADCAST_LINK);
        assert_eq!(destination(ExchangeKind::Echo, "ICMP")?, BROADCAST_LINK);
        Ok(())
    }

    #[test]
    fn control_frames_use_the_link_destination() -> anyhow::Result<()> {
        let (client, server) = endpoints();
        let events = ExchangeSimulator::new()
            .link_destination("00:11:22:33:44:03")
            .run(ExchangeKind::Handshake, "", "TCP", &client, &server, &mut ScriptedRng::new())?;
        for event in &events {
            let link = event.frame.as_ref().unwrap().link().unwrap();
            assert_eq!(link.destination, "00:11:22:33:44:03");
        }
        Ok(())
    }

    #[test]
    fn event_names() {
        assert_eq!(EventKind::SynAckSent.to_string(), "SYN-ACK sent");
        assert_eq!(
            EventKind::CollisionDetected.to_string(),
            "Collision detected, retransmitting"
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn logs_every_event() -> anyhow::Result<()> {
        let (client, server) = endpoints();
        build_exchange(
            ExchangeKind::Echo,
            "",
            "ICMP",
            &client,
            &server,
            &mut ScriptedRng::new(),
        )?;
        assert!(logs_contain("Echo Request sent"));
        assert!(logs_contain("Echo Reply sent"));
        Ok(())
    }
}
