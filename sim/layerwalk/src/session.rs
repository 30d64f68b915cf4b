//! A [`Session`] ties an [`ExchangeSimulator`] to a [`Topology`] and keeps the
//! events of the most recent send.

use layerwalk_core::{
    exchange::{ExchangeEvent, ExchangeKind, ExchangeSimulator},
    impairment::{ImpairmentError, Outcome},
    protocol::TransportProtocol,
    rng::RandomSource,
    topology::{HopReport, TopologyError},
    AddressIdentity, Topology, UnsupportedProtocolError,
};
use thiserror::Error as ThisError;
use tracing::{event, Level};

/// An exchange event together with the devices its frame passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedEvent {
    pub event: ExchangeEvent,
    /// Sender first, receiver last. Empty when nothing arrived.
    pub path: Vec<String>,
    /// What each relay on the path did with the frame
    pub hops: Vec<HopReport>,
}

/// The user's view of the simulation: two hosts on a topology and the events
/// of the last send.
#[derive(Debug, Clone)]
pub struct Session {
    topology: Topology,
    client: String,
    server: String,
    simulator: ExchangeSimulator,
    events: Vec<AnnotatedEvent>,
}

impl Session {
    /// Creates a session between two hosts of the topology.
    pub fn new(
        topology: Topology,
        client: impl Into<String>,
        server: impl Into<String>,
        simulator: ExchangeSimulator,
    ) -> Result<Self, SessionError> {
        let client = client.into();
        let server = server.into();
        for name in [&client, &server] {
            if topology.host(name).is_none() {
                Err(SessionError::UnknownHost(name.clone()))?
            }
        }
        Ok(Self {
            topology,
            client,
            server,
            simulator,
            events: Vec::new(),
        })
    }

    /// A session between the client and server of [`Topology::lan`]. Generic
    /// sends are addressed to the switch.
    pub fn lan(simulator: ExchangeSimulator) -> Result<Self, SessionError> {
        let topology = Topology::lan()?;
        let switch = topology
            .device("Switch")
            .ok_or_else(|| TopologyError::UnknownDevice("Switch".into()))?
            .link()
            .to_string();
        Self::new(
            topology,
            "Client",
            "Server",
            simulator.generic_destination(switch),
        )
    }

    /// Throws away the previous events and generates a fresh exchange.
    ///
    /// Without an explicit kind, the kind follows the protocol: TCP
    /// handshakes, ICMP echoes, and everything else is a generic send.
    pub fn send(
        &mut self,
        message: &str,
        protocol: &str,
        kind: Option<ExchangeKind>,
        rng: &mut dyn RandomSource,
    ) -> Result<&[AnnotatedEvent], SessionError> {
        self.events.clear();
        let kind = kind.unwrap_or_else(|| {
            protocol
                .parse::<TransportProtocol>()
                .map_or(ExchangeKind::Generic, ExchangeKind::for_protocol)
        });

        let (client, server) = self.endpoints()?;
        let events = self
            .simulator
            .run(kind, message, protocol, client, server, rng)?;
        event!(
            target: "SESSION",
            Level::INFO,
            kind = ?kind,
            protocol = protocol,
            events = events.len(),
            "exchange generated"
        );

        self.events = events
            .into_iter()
            .map(|event| self.annotate(event))
            .collect();
        Ok(&self.events)
    }

    /// The events of the last send.
    pub fn events(&self) -> &[AnnotatedEvent] {
        &self.events
    }

    fn endpoints(&self) -> Result<(&AddressIdentity, &AddressIdentity), SessionError> {
        let host = |name: &str| {
            self.topology
                .host(name)
                .ok_or_else(|| SessionError::UnknownHost(name.to_string()))
        };
        Ok((host(&self.client)?, host(&self.server)?))
    }

    fn annotate(&self, event: ExchangeEvent) -> AnnotatedEvent {
        let arrived = event.outcome != Outcome::Lost;
        let (path, hops) = match &event.frame {
            Some(frame) if arrived => {
                let path = self
                    .topology
                    .path(&event.from, &event.to)
                    .unwrap_or_default();
                let hops = self.topology.walk(frame, &path);
                (path, hops)
            }
            _ => (Vec::new(), Vec::new()),
        };
        AnnotatedEvent { event, path, hops }
    }
}

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("{0}")]
    UnsupportedProtocol(#[from] UnsupportedProtocolError),
    #[error("{0}")]
    Impairment(#[from] ImpairmentError),
    #[error("{0}")]
    Topology(#[from] TopologyError),
    #[error("No host named {0} in the topology")]
    UnknownHost(String),
}
