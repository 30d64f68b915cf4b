//! Logging holds wrapper functions for logging simulation events.
//! Each function corresponds to a type of event (frames built, frames read,
//! exchange steps). The core never installs a subscriber; the front end
//! decides where these go.

use crate::{exchange::ExchangeEvent, layer::LayerHeader, protocol::TransportProtocol};
use tracing::{event, Level};

/// Frame event handler.
/// Used to log every frame the builder composes. Captures the following data:
/// protocol, src_net, dst_net, layers
pub(crate) fn frame_built(
    protocol: TransportProtocol,
    src_net: &str,
    dst_net: &str,
    trace: &[LayerHeader],
) {
    event!(
        target: "FRAME",
        Level::DEBUG,
        protocol = %protocol,
        src_net = src_net,
        dst_net = dst_net,
        layers = trace.len(),
        "frame built"
    );
}

/// Used to log every frame the reader peels apart.
pub(crate) fn frame_read(trace: &[LayerHeader]) {
    event!(target: "FRAME", Level::TRACE, layers = trace.len(), "frame read");
}

/// Exchange event handler.
/// Used to log every event the simulator emits. Captures the following data:
/// kind, from, to, outcome
pub(crate) fn exchange_event(exchange_event: &ExchangeEvent) {
    event!(
        target: "EXCHANGE",
        Level::INFO,
        kind = %exchange_event.kind,
        from = exchange_event.from.as_str(),
        to = exchange_event.to.as_str(),
        outcome = ?exchange_event.outcome,
        "exchange event"
    );
}

/// Used when a link gate fires.
pub(crate) fn gate_triggered(gate: &'static str, draw: f64, probability: f64) {
    event!(target: "LINK", Level::DEBUG, gate = gate, draw = draw, probability = probability, "gate triggered");
}
