//! Decapsulation: peeling a frame from the outside in.
//!
//! The reader is the structural inverse of the [builder](crate::builder). It
//! walks Data Link, Network, and Transport in that order, skipping any layer
//! the frame does not have, then looks at the remaining payload.
//!
//! Frames carry no flag saying whether TLS was applied. Instead the reader
//! sniffs the payload: if it begins with [`TLS_MARKER`] a TLS entry is
//! reported. This is a heuristic, so a plain payload that happens to start
//! with the marker is reported as encrypted too.

use crate::{
    builder::TLS_MARKER,
    frame::{Frame, Header},
    layer::{Layer, LayerHeader},
    logging,
};

/// Recovers the layer trace of a frame, Data Link first.
///
/// For frames built with TCP or UDP, the reversed result equals the trace the
/// builder returned. The original frame is left untouched.
pub fn read_frame(frame: &Frame) -> Vec<LayerHeader> {
    let visible = frame.payload_text();
    let mut trace = Vec::with_capacity(Layer::ASCENDING.len());

    for layer in [Layer::DataLink, Layer::Network, Layer::Transport] {
        if let Some(header) = frame.header(layer) {
            trace.push(LayerHeader::with_summary(
                layer,
                header.to_string(),
                visible.clone(),
            ));
        }
    }

    let application = match visible.strip_prefix(TLS_MARKER) {
        Some(decrypted) => {
            trace.push(LayerHeader::bare(Layer::Tls, visible.clone()));
            decrypted.to_string()
        }
        None => visible,
    };

    // A header that carries nothing (ICMP) leaves no application data behind
    let carries_payload = frame
        .transport()
        .or_else(|| frame.headers().last())
        .map_or(true, Header::carries_payload);
    if carries_payload || !application.is_empty() {
        trace.push(LayerHeader::bare(Layer::Application, application));
    }

    logging::frame_read(&trace);
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::FrameBuilder,
        frame::{EthernetHeader, NetworkHeader, UdpHeader},
        layer::is_descending,
        protocol::TransportProtocol,
    };

    fn layers(trace: &[LayerHeader]) -> Vec<Layer> {
        trace.iter().map(|entry| entry.layer).collect()
    }

    #[test]
    fn reads_tcp_outside_in() {
        let (frame, _) = FrameBuilder::new(TransportProtocol::Tcp).build("secret");
        let trace = read_frame(&frame);
        assert_eq!(
            layers(&trace),
            [
                Layer::DataLink,
                Layer::Network,
                Layer::Transport,
                Layer::Tls,
                Layer::Application
            ]
        );
        assert_eq!(trace[3].data, "[ENCRYPTED]:secret");
        assert_eq!(trace[4].data, "secret");
        assert!(is_descending(&trace));
    }

    #[test]
    fn icmp_has_no_application_entry() {
        let (frame, _) = FrameBuilder::new(TransportProtocol::Icmp).build("ignored");
        let trace = read_frame(&frame);
        assert_eq!(
            layers(&trace),
            [Layer::DataLink, Layer::Network, Layer::Transport]
        );
    }

    #[test]
    fn missing_layers_are_skipped() {
        let (frame, _) = FrameBuilder::new(TransportProtocol::Udp).build("hi");
        let trace = read_frame(&frame.without(Layer::Transport));
        assert_eq!(
            layers(&trace),
            [Layer::DataLink, Layer::Network, Layer::Application]
        );

        let bare = Frame::from_parts(Vec::<Header>::new(), "just text");
        assert_eq!(
            read_frame(&bare),
            [LayerHeader::bare(Layer::Application, "just text")]
        );
    }

    #[test]
    fn tls_detection_is_by_prefix() {
        // UDP never encrypts, but a payload with the marker looks encrypted
        let (frame, _) = FrameBuilder::new(TransportProtocol::Udp).build("[ENCRYPTED]:fake");
        let trace = read_frame(&frame);
        assert!(trace.iter().any(|entry| entry.layer == Layer::Tls));
        assert_eq!(trace.last().map(|entry| entry.data.as_str()), Some("fake"));
    }

    #[test]
    fn headers_are_read_in_layer_order() {
        // Out-of-order parts are still reported Data Link first
        let frame = Frame::from_parts(
            [
                Header::Udp(UdpHeader::new(1, 2, 0)),
                Header::Ethernet(EthernetHeader::new("aa", "bb")),
                Header::Network(NetworkHeader::new("1.1.1.1", "2.2.2.2", TransportProtocol::Udp)),
            ],
            "",
        );
        let trace = read_frame(&frame);
        assert!(is_descending(&trace));
        assert_eq!(trace.len(), 4);
    }
}
