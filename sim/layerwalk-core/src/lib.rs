//! Layerwalk, a library for watching a message travel down the network stack,
//! across a link, and back up again.
//!
//! # Uses
//!
//! - Educators can use Layerwalk to show what each layer adds to a message:
//!   the TLS prefix, transport ports and flags, network and link addresses.
//! - Students can step through a TCP handshake or an ICMP echo one segment at
//!   a time and see how sequence numbers and identifiers line up.
//!
//! # Organization
//!
//! - [`FrameBuilder`](builder::FrameBuilder) encapsulates a message into a
//!   [`Frame`](frame::Frame) and [`read_frame`] decapsulates it again. Both
//!   report a trace of [`LayerHeader`](layer::LayerHeader)s.
//! - [`ExchangeSimulator`](exchange::ExchangeSimulator) generates the events
//!   of a handshake, an echo, or a single send over a
//!   [`LinkImpairment`](impairment::LinkImpairment).
//! - [`Topology`](topology::Topology) describes the devices between the two
//!   endpoints and what each relay does with a frame.
//!
//! All randomness comes from a caller-supplied
//! [`RandomSource`](rng::RandomSource), so any run can be replayed.

mod logging;

pub mod layer;
pub use layer::{Layer, LayerHeader};

pub mod protocol;
pub use protocol::{TransportProtocol, UnsupportedProtocolError};

pub mod address;
pub use address::AddressIdentity;

pub mod frame;
pub use frame::Frame;

pub mod builder;
pub use builder::build;

mod reader;
pub use reader::read_frame;

pub mod rng;

pub mod impairment;
pub use impairment::LinkImpairment;

pub mod exchange;
pub use exchange::build_exchange;

pub mod topology;
pub use topology::Topology;
