use super::ExchangeEvent;
use crate::{
    address::AddressIdentity, builder::FrameBuilder, exchange::EventKind,
    impairment::LinkImpairment, rng::RandomSource,
};

/// Sends one frame over an impaired link.
///
/// The collision gate is drawn first. On a collision an advisory event is
/// reported and the frame is rebuilt from the same inputs; the retry only
/// faces the loss gate, so there is never more than one retry. The final
/// frame is then reported as sent or lost.
pub(super) fn send(
    builder: &FrameBuilder,
    message: &str,
    client: &AddressIdentity,
    server: &AddressIdentity,
    link: &LinkImpairment,
    rng: &mut dyn RandomSource,
) -> Vec<ExchangeEvent> {
    let mut events = Vec::with_capacity(2);
    let mut built = builder.build(message);

    if link.collides(rng) {
        events.push(ExchangeEvent::collision(client, server));
        built = builder.build(message);
    }

    if link.loses(rng) {
        events.push(ExchangeEvent::lost(client, server, built.0));
    } else {
        events.push(ExchangeEvent::delivered(
            EventKind::PacketSent,
            client,
            server,
            built,
        ));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{impairment::Outcome, protocol::TransportProtocol, rng::ScriptedRng};

    fn run(units: &[f64]) -> Vec<ExchangeEvent> {
        let client = AddressIdentity::new("Client", "192.168.1.100", "aa").unwrap();
        let server = AddressIdentity::new("Server", "192.168.1.10", "bb").unwrap();
        let builder = FrameBuilder::new(TransportProtocol::Udp);
        let mut rng = ScriptedRng::new().with_units(units.iter().copied());
        send(
            &builder,
            "hello",
            &client,
            &server,
            &LinkImpairment::default(),
            &mut rng,
        )
    }

    fn kinds(events: &[ExchangeEvent]) -> Vec<EventKind> {
        events.iter().map(|event| event.kind).collect()
    }

    #[test]
    fn clean_send() {
        let events = run(&[0.9, 0.9]);
        assert_eq!(kinds(&events), [EventKind::PacketSent]);
        assert_eq!(events[0].outcome, Outcome::Delivered);
        assert_eq!(events[0].trace.len(), 4);
    }

    #[test]
    fn lost_without_collision() {
        // Collision draw misses, loss draw hits
        let events = run(&[0.5, 0.1]);
        assert_eq!(kinds(&events), [EventKind::PacketLost]);
        assert_eq!(events[0].outcome, Outcome::Lost);
        assert!(events[0].trace.is_empty());
        assert!(events[0].frame.is_some());
    }

    #[test]
    fn collision_then_delivered() {
        let events = run(&[0.25]);
        assert_eq!(
            kinds(&events),
            [EventKind::CollisionDetected, EventKind::PacketSent]
        );
        assert!(events[0].is_advisory());
        assert_eq!(events[0].outcome, Outcome::CollidedThenRetried);
        assert_eq!(events[1].outcome, Outcome::Delivered);
    }

    #[test]
    fn collision_then_lost() {
        let events = run(&[0.1]);
        assert_eq!(
            kinds(&events),
            [EventKind::CollisionDetected, EventKind::PacketLost]
        );
    }
}
