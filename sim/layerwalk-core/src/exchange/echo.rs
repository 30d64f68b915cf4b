use super::{control_frame, EventKind, ExchangeEvent, Steps};
use crate::{
    address::AddressIdentity,
    builder::FrameBuilder,
    frame::IcmpHeader,
    protocol::TransportProtocol,
    rng::RandomSource,
};

/// Where an echo exchange stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EchoState {
    Start,
    EchoRequestSent,
    /// Terminal
    EchoReplySent,
}

/// An ICMP echo request from the client and the server's reply. The reply
/// always carries back the request's identifier and sequence number.
#[derive(Debug, Clone)]
pub struct Echo<'a> {
    state: EchoState,
    client: &'a AddressIdentity,
    server: &'a AddressIdentity,
    link_destination: &'a str,
    request: IcmpHeader,
}

impl<'a> Echo<'a> {
    pub fn new(
        client: &'a AddressIdentity,
        server: &'a AddressIdentity,
        link_destination: &'a str,
    ) -> Self {
        Self {
            state: EchoState::Start,
            client,
            server,
            link_destination,
            request: IcmpHeader::default(),
        }
    }

    pub fn state(&self) -> EchoState {
        self.state
    }
}

impl Steps for Echo<'_> {
    fn advance(&mut self, rng: &mut dyn RandomSource) -> Option<ExchangeEvent> {
        let icmp = FrameBuilder::new(TransportProtocol::Icmp);
        match self.state {
            EchoState::Start => {
                let identifier = rng.next_u16();
                let sequence = rng.next_u16();
                self.request = IcmpHeader::echo_request(identifier, sequence);
                let built = control_frame(
                    icmp.icmp_header(self.request),
                    self.client,
                    self.server,
                    self.link_destination,
                );
                self.state = EchoState::EchoRequestSent;
                Some(ExchangeEvent::delivered(
                    EventKind::EchoRequestSent,
                    self.client,
                    self.server,
                    built,
                ))
            }

            EchoState::EchoRequestSent => {
                let built = control_frame(
                    icmp.icmp_header(self.request.reply()),
                    self.server,
                    self.client,
                    self.link_destination,
                );
                self.state = EchoState::EchoReplySent;
                Some(ExchangeEvent::delivered(
                    EventKind::EchoReplySent,
                    self.server,
                    self.client,
                    built,
                ))
            }

            EchoState::EchoReplySent => None,
        }
    }
}
