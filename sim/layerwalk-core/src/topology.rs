//! Contains the [`Topology`] of devices an exchange travels through, and the
//! [`Relay`] devices that decide where a frame goes next.
//!
//! The topology is descriptive: it does not carry frames itself. Exchanges are
//! generated end to end and the topology is asked afterwards which way each
//! frame went and what every relay on the way would have done with it.

use crate::{
    address::{AddressError, AddressIdentity},
    frame::Frame,
};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt::{self, Display},
};
use thiserror::Error as ThisError;

/// What a relay does with a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hop {
    /// Forward out of a single switch port
    Port(usize),
    /// Forward out of every switch port
    Flood,
    /// Route toward the named device
    NextHop(String),
    /// No route, the frame goes nowhere
    Drop,
}

/// A device that sends and receives frames under its own addresses.
pub trait Host {
    fn identity(&self) -> &AddressIdentity;
}

impl Host for AddressIdentity {
    fn identity(&self) -> &AddressIdentity {
        self
    }
}

/// A device that forwards frames on behalf of others.
pub trait Relay {
    /// Decides where the frame goes next without changing it.
    fn relay(&self, frame: &Frame) -> Hop;
}

/// A learning switch. Forwards by destination link address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    name: String,
    link: String,
    ports: BTreeMap<String, usize>,
}

impl Switch {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            ports: BTreeMap::new(),
        }
    }

    /// Records that `link` is reachable through `port`. A later call for the
    /// same address replaces the earlier port.
    pub fn learn(&mut self, link: impl Into<String>, port: usize) {
        self.ports.insert(link.into(), port);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}

impl Relay for Switch {
    fn relay(&self, frame: &Frame) -> Hop {
        frame
            .link()
            .and_then(|link| self.ports.get(&link.destination))
            .map_or(Hop::Flood, |port| Hop::Port(*port))
    }
}

/// A router with an ordered table of network address prefixes. The first
/// prefix the destination starts with wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    identity: AddressIdentity,
    routes: Vec<(String, String)>,
}

impl Router {
    pub fn new(identity: AddressIdentity) -> Self {
        Self {
            identity,
            routes: Vec::new(),
        }
    }

    /// Appends a route sending anything under `prefix` to `next_hop`.
    pub fn route(mut self, prefix: impl Into<String>, next_hop: impl Into<String>) -> Self {
        self.routes.push((prefix.into(), next_hop.into()));
        self
    }

    /// The frame as the router would send it on: sourced from the router's
    /// own link address and addressed to the next hop's.
    pub fn rewrite(&self, frame: &Frame, next_link: &str) -> Frame {
        frame.with_link_addresses(self.identity.link(), next_link)
    }
}

impl Host for Router {
    fn identity(&self) -> &AddressIdentity {
        &self.identity
    }
}

impl Relay for Router {
    fn relay(&self, frame: &Frame) -> Hop {
        let Some(network) = frame.network() else {
            return Hop::Drop;
        };
        self.routes
            .iter()
            .find(|(prefix, _)| network.destination.starts_with(prefix.as_str()))
            .map_or(Hop::Drop, |(_, next_hop)| Hop::NextHop(next_hop.clone()))
    }
}

/// Anything that can be placed in a [`Topology`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    Client(AddressIdentity),
    Server(AddressIdentity),
    Switch(Switch),
    Router(Router),
}

impl Device {
    pub fn name(&self) -> &str {
        match self {
            Device::Client(identity) | Device::Server(identity) => identity.name(),
            Device::Switch(switch) => switch.name(),
            Device::Router(router) => router.identity().name(),
        }
    }

    /// The device's link address.
    pub fn link(&self) -> &str {
        match self {
            Device::Client(identity) | Device::Server(identity) => identity.link(),
            Device::Switch(switch) => switch.link(),
            Device::Router(router) => router.identity().link(),
        }
    }

    pub fn as_host(&self) -> Option<&dyn Host> {
        match self {
            Device::Client(identity) | Device::Server(identity) => Some(identity),
            Device::Router(router) => Some(router),
            Device::Switch(_) => None,
        }
    }

    pub fn as_relay(&self) -> Option<&dyn Relay> {
        match self {
            Device::Switch(switch) => Some(switch),
            Device::Router(router) => Some(router),
            Device::Client(_) | Device::Server(_) => None,
        }
    }
}

/// What one relay on a path did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopReport {
    pub device: String,
    pub hop: Hop,
}

impl Display for HopReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.device)?;
        match &self.hop {
            Hop::Port(port) => write!(f, "port {port}"),
            Hop::Flood => write!(f, "flood"),
            Hop::NextHop(next) => write!(f, "next hop {next}"),
            Hop::Drop => write!(f, "drop"),
        }
    }
}

/// Devices and the undirected links between them.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    devices: Vec<Device>,
    links: Vec<(usize, usize)>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four-device LAN: a client and a router on a switch, with the
    /// server behind the router.
    ///
    /// ```text
    /// Client --- Switch --- Router --- Server
    /// ```
    pub fn lan() -> Result<Self, TopologyError> {
        let client = AddressIdentity::new("Client", "192.168.1.100", "00:11:22:33:44:01")?;
        let router = AddressIdentity::new("Router", "192.168.1.1", "00:11:22:33:44:03")?;
        let server = AddressIdentity::new("Server", "192.168.1.10", "00:11:22:33:44:04")?;

        let mut switch = Switch::new("Switch", "00:11:22:33:44:02");
        switch.learn(client.link(), 0);
        switch.learn(router.link(), 1);
        let router = Router::new(router).route("192.168.1.", "Server");

        let mut topology = Self::new();
        topology.add(Device::Client(client))?;
        topology.add(Device::Switch(switch))?;
        topology.add(Device::Router(router))?;
        topology.add(Device::Server(server))?;
        topology.connect("Client", "Switch")?;
        topology.connect("Switch", "Router")?;
        topology.connect("Router", "Server")?;
        Ok(topology)
    }

    /// Adds a device. Names must be unique.
    pub fn add(&mut self, device: Device) -> Result<(), TopologyError> {
        if self.index(device.name()).is_some() {
            Err(TopologyError::DuplicateDevice(device.name().to_string()))?
        }
        self.devices.push(device);
        Ok(())
    }

    /// Links two named devices.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), TopologyError> {
        let a = self.require(a)?;
        let b = self.require(b)?;
        self.links.push((a, b));
        Ok(())
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.index(name).map(|index| &self.devices[index])
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> + '_ {
        self.devices.iter()
    }

    /// The host with the given name, if there is one.
    pub fn host(&self, name: &str) -> Option<&AddressIdentity> {
        self.device(name)
            .and_then(Device::as_host)
            .map(|host| host.identity())
    }

    /// The shortest chain of device names from `from` to `to`, both included.
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let start = self.index(from)?;
        let goal = self.index(to)?;

        let mut previous: Vec<Option<usize>> = vec![None; self.devices.len()];
        let mut seen = vec![false; self.devices.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(current) = queue.pop_front() {
            if current == goal {
                let mut path = vec![self.devices[current].name().to_string()];
                let mut at = current;
                while let Some(before) = previous[at] {
                    path.push(self.devices[before].name().to_string());
                    at = before;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.neighbors(current) {
                if !seen[next] {
                    seen[next] = true;
                    previous[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Asks every relay on `path` what it would do with `frame`. A router
    /// that names a next hop rewrites the frame's link addresses before it
    /// moves on.
    pub fn walk(&self, frame: &Frame, path: &[String]) -> Vec<HopReport> {
        let mut frame = frame.clone();
        let mut reports = Vec::new();
        for device in path.iter().filter_map(|name| self.device(name)) {
            let Some(relay) = device.as_relay() else {
                continue;
            };
            let hop = relay.relay(&frame);
            if let (Device::Router(router), Hop::NextHop(next)) = (device, &hop) {
                if let Some(next) = self.device(next) {
                    frame = router.rewrite(&frame, next.link());
                }
            }
            reports.push(HopReport {
                device: device.name().to_string(),
                hop,
            });
        }
        reports
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.devices.iter().position(|device| device.name() == name)
    }

    fn require(&self, name: &str) -> Result<usize, TopologyError> {
        self.index(name)
            .ok_or_else(|| TopologyError::UnknownDevice(name.to_string()))
    }

    fn neighbors(&self, device: usize) -> impl Iterator<Item = usize> + '_ {
        self.links.iter().filter_map(move |&(a, b)| {
            if a == device {
                Some(b)
            } else if b == device {
                Some(a)
            } else {
                None
            }
        })
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("No device is named {0}")]
    UnknownDevice(String),
    #[error("A device named {0} already exists")]
    DuplicateDevice(String),
    #[error("{0}")]
    Address(#[from] AddressError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::FrameBuilder, protocol::TransportProtocol};

    fn names(path: &[&str]) -> Vec<String> {
        path.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn lan_paths() -> anyhow::Result<()> {
        let lan = Topology::lan()?;
        assert_eq!(
            lan.path("Client", "Server"),
            Some(names(&["Client", "Switch", "Router", "Server"]))
        );
        assert_eq!(
            lan.path("Server", "Client"),
            Some(names(&["Server", "Router", "Switch", "Client"]))
        );
        assert_eq!(lan.path("Client", "Client"), Some(names(&["Client"])));
        assert_eq!(lan.path("Client", "Nowhere"), None);
        Ok(())
    }

    #[test]
    fn disconnected_devices_have_no_path() -> anyhow::Result<()> {
        let mut topology = Topology::new();
        topology.add(Device::Client(AddressIdentity::new("A", "10.0.0.1", "aa")?))?;
        topology.add(Device::Server(AddressIdentity::new("B", "10.0.0.2", "bb")?))?;
        assert_eq!(topology.path("A", "B"), None);
        topology.connect("A", "B")?;
        assert_eq!(topology.path("A", "B"), Some(names(&["A", "B"])));
        Ok(())
    }

    #[test]
    fn rejects_bad_devices() -> anyhow::Result<()> {
        let mut lan = Topology::lan()?;
        assert_eq!(
            lan.connect("Client", "Printer"),
            Err(TopologyError::UnknownDevice("Printer".into()))
        );
        let again = Device::Switch(Switch::new("Switch", "ee"));
        assert_eq!(
            lan.add(again),
            Err(TopologyError::DuplicateDevice("Switch".into()))
        );
        Ok(())
    }

    #[test]
    fn switch_forwards_known_and_floods_unknown() {
        let mut switch = Switch::new("Switch", "00:11:22:33:44:02");
        switch.learn("00:11:22:33:44:03", 1);
        let (known, _) = FrameBuilder::new(TransportProtocol::Udp)
            .link("00:11:22:33:44:01", "00:11:22:33:44:03")
            .build("x");
        assert_eq!(switch.relay(&known), Hop::Port(1));
        let (unknown, _) = FrameBuilder::new(TransportProtocol::Udp).build("x");
        assert_eq!(switch.relay(&unknown), Hop::Flood);
        assert_eq!(switch.relay(&Frame::default()), Hop::Flood);
    }

    #[test]
    fn router_matches_first_prefix() -> anyhow::Result<()> {
        let router = Router::new(AddressIdentity::new("R", "10.0.0.1", "rr")?)
            .route("10.0.1.", "Lab")
            .route("10.0.", "Office");
        let to = |destination: &str| {
            FrameBuilder::new(TransportProtocol::Udp)
                .network("10.0.0.5", destination)
                .build("x")
                .0
        };
        assert_eq!(router.relay(&to("10.0.1.7")), Hop::NextHop("Lab".into()));
        assert_eq!(router.relay(&to("10.0.9.9")), Hop::NextHop("Office".into()));
        assert_eq!(router.relay(&to("172.16.0.1")), Hop::Drop);
        assert_eq!(router.relay(&Frame::default()), Hop::Drop);
        Ok(())
    }

    #[test]
    fn router_rewrites_link_source() -> anyhow::Result<()> {
        let router = Router::new(AddressIdentity::new("R", "10.0.0.1", "rr")?);
        let (frame, _) = FrameBuilder::new(TransportProtocol::Tcp)
            .link("aa", "rr")
            .network("10.0.0.5", "10.0.0.9")
            .build("x");
        let rewritten = router.rewrite(&frame, "bb");
        let link = rewritten.link().unwrap();
        assert_eq!((link.source.as_str(), link.destination.as_str()), ("rr", "bb"));
        assert_eq!(rewritten.network(), frame.network());
        assert_eq!(rewritten.payload(), frame.payload());
        Ok(())
    }

    #[test]
    fn walk_reports_each_relay() -> anyhow::Result<()> {
        let lan = Topology::lan()?;
        let client = lan.host("Client").unwrap();
        let server = lan.host("Server").unwrap();
        let (frame, _) = FrameBuilder::new(TransportProtocol::Tcp)
            .link(client.link(), "00:11:22:33:44:03")
            .network(client.network(), server.network())
            .build("Hello");
        let path = lan.path("Client", "Server").unwrap();
        assert_eq!(
            lan.walk(&frame, &path),
            [
                HopReport {
                    device: "Switch".into(),
                    hop: Hop::Port(1)
                },
                HopReport {
                    device: "Router".into(),
                    hop: Hop::NextHop("Server".into())
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn hop_reports_read_plainly() {
        let report = |device: &str, hop| HopReport {
            device: device.into(),
            hop,
        };
        assert_eq!(report("Switch", Hop::Port(1)).to_string(), "Switch: port 1");
        assert_eq!(report("Switch", Hop::Flood).to_string(), "Switch: flood");
        assert_eq!(
            report("Router", Hop::NextHop("Server".into())).to_string(),
            "Router: next hop Server"
        );
        assert_eq!(report("Router", Hop::Drop).to_string(), "Router: drop");
    }

    #[test]
    fn hosts_and_relays() -> anyhow::Result<()> {
        let lan = Topology::lan()?;
        assert_eq!(lan.host("Router").map(|id| id.network()), Some("192.168.1.1"));
        assert!(lan.host("Switch").is_none());
        assert!(lan.device("Client").unwrap().as_relay().is_none());
        assert_eq!(lan.devices().count(), 4);
        Ok(())
    }
}
