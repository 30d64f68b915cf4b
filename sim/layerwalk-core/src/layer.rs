//! The layer tags and per-layer trace entries shown while a frame is built or
//! read.

use std::fmt::{self, Display};

/// One layer of the simulated network stack.
///
/// The variants are declared from the top of the stack down so that the
/// derived ordering is layer-ascending: `Application < Tls < ... < DataLink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// The raw message handed down by the user.
    Application,
    /// The simplified encryption wrapper applied to TCP payloads.
    Tls,
    /// TCP, UDP, or ICMP.
    Transport,
    /// IP addressing.
    Network,
    /// Ethernet addressing.
    DataLink,
}

impl Layer {
    /// Every layer, in build (ascending) order.
    pub const ASCENDING: [Layer; 5] = [
        Layer::Application,
        Layer::Tls,
        Layer::Transport,
        Layer::Network,
        Layer::DataLink,
    ];

    /// A human-readable name for the layer.
    pub const fn name(self) -> &'static str {
        match self {
            Layer::Application => "Application",
            Layer::Tls => "TLS/SSL",
            Layer::Transport => "Transport",
            Layer::Network => "Network",
            Layer::DataLink => "Data Link",
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One entry in a frame's trace: which layer contributed, what its header
/// said, and what payload was still visible at that point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerHeader {
    /// The layer this entry describes
    pub layer: Layer,
    /// A short description of the header fields. Absent for the Application
    /// and TLS layers, which attach no header of their own.
    pub summary: Option<String>,
    /// The payload visible after this layer's header was attached, or empty
    /// if the layer carries none.
    pub data: String,
}

impl LayerHeader {
    /// Creates an entry for a layer that attaches no header.
    pub fn bare(layer: Layer, data: impl Into<String>) -> Self {
        Self {
            layer,
            summary: None,
            data: data.into(),
        }
    }

    /// Creates an entry for a layer with a header summary.
    pub fn with_summary(layer: Layer, summary: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            layer,
            summary: Some(summary.into()),
            data: data.into(),
        }
    }
}

/// Checks that a trace is strictly layer-ascending, as the builder produces
/// it.
pub fn is_ascending(trace: &[LayerHeader]) -> bool {
    trace.windows(2).all(|pair| pair[0].layer < pair[1].layer)
}

/// Checks that a trace is strictly layer-descending, as the reader produces
/// it.
pub fn is_descending(trace: &[LayerHeader]) -> bool {
    trace.windows(2).all(|pair| pair[0].layer > pair[1].layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_the_stack() {
        let mut shuffled = vec![
            Layer::Network,
            Layer::Application,
            Layer::DataLink,
            Layer::Transport,
            Layer::Tls,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Layer::ASCENDING);
    }

    #[test]
    fn detects_ordering() {
        let trace = vec![
            LayerHeader::bare(Layer::Application, "hi"),
            LayerHeader::with_summary(Layer::Transport, "UDP 12345 > 53 len=10", "hi"),
        ];
        assert!(is_ascending(&trace));
        assert!(!is_descending(&trace));

        let reversed: Vec<_> = trace.into_iter().rev().collect();
        assert!(is_descending(&reversed));
    }
}
