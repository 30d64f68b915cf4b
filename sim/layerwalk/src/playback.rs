//! Steps through a session's events at a fixed pace, writing each one out.

use crate::session::AnnotatedEvent;
use std::{io::Write, time::Duration};
use tokio::time::{interval, MissedTickBehavior};

/// Plays back a list of events.
///
/// Events whose frame travelled a path wait for the next tick before they are
/// shown. Advisories and lost frames are shown straight away. A zero step
/// disables waiting.
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    step: Duration,
}

impl Playback {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }

    pub async fn play(&self, events: &[AnnotatedEvent], out: &mut impl Write) -> std::io::Result<()> {
        let mut ticks = (!self.step.is_zero()).then(|| {
            let mut ticks = interval(self.step);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticks
        });

        for (index, annotated) in events.iter().enumerate() {
            if !annotated.path.is_empty() {
                if let Some(ticks) = ticks.as_mut() {
                    ticks.tick().await;
                }
            }
            writeln!(out, "Step {}/{}", index + 1, events.len())?;
            render(annotated, out)?;
        }
        writeln!(out, "Simulation finished.")?;
        out.flush()
    }
}

/// Writes one event: what happened, where it went, what the relays did, and
/// what every layer held.
pub fn render(annotated: &AnnotatedEvent, out: &mut impl Write) -> std::io::Result<()> {
    let event = &annotated.event;
    writeln!(out, "{}: {} -> {}", event.kind, event.from, event.to)?;
    if !annotated.path.is_empty() {
        writeln!(out, "Path: {}", annotated.path.join(" -> "))?;
    }
    if !annotated.hops.is_empty() {
        writeln!(out, "Hops:")?;
        for report in &annotated.hops {
            writeln!(out, "  {report}")?;
        }
    }
    for entry in &event.trace {
        writeln!(out, "{} Layer:", entry.layer)?;
        if let Some(summary) = &entry.summary {
            writeln!(out, "  Header: {summary}")?;
        }
        writeln!(out, "  Data: {}", entry.data)?;
    }
    Ok(())
}
