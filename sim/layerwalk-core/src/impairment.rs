use crate::{logging, rng::RandomSource};
use thiserror::Error as ThisError;

/// The default chance that a frame is lost in transit.
pub const DEFAULT_LOSS_PROBABILITY: f64 = 0.20;
/// The default chance that a frame collides on the link.
pub const DEFAULT_COLLISION_PROBABILITY: f64 = 0.30;

/// What happened to a frame in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The frame arrived.
    Delivered,
    /// The frame vanished on the link.
    Lost,
    /// The frame collided and was sent again.
    CollidedThenRetried,
}

/// A link with two independent probabilistic faults: loss and collision.
///
/// Each gate fires when a draw from the random source falls below its
/// probability. The gates keep no state between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkImpairment {
    loss_probability: f64,
    collision_probability: f64,
}

impl LinkImpairment {
    /// Creates a link with the given loss and collision probabilities, each in
    /// the range [0, 1].
    pub fn new(loss_probability: f64, collision_probability: f64) -> Result<Self, ImpairmentError> {
        Ok(Self {
            loss_probability: check_probability("loss", loss_probability)?,
            collision_probability: check_probability("collision", collision_probability)?,
        })
    }

    /// A link that never loses or collides.
    pub const fn disabled() -> Self {
        Self {
            loss_probability: 0.0,
            collision_probability: 0.0,
        }
    }

    pub fn loss_probability(&self) -> f64 {
        self.loss_probability
    }

    pub fn collision_probability(&self) -> f64 {
        self.collision_probability
    }

    /// Draws once from the loss gate.
    pub fn loses(&self, rng: &mut dyn RandomSource) -> bool {
        gate("loss", self.loss_probability, rng)
    }

    /// Draws once from the collision gate.
    pub fn collides(&self, rng: &mut dyn RandomSource) -> bool {
        gate("collision", self.collision_probability, rng)
    }
}

impl Default for LinkImpairment {
    fn default() -> Self {
        Self {
            loss_probability: DEFAULT_LOSS_PROBABILITY,
            collision_probability: DEFAULT_COLLISION_PROBABILITY,
        }
    }
}

fn gate(name: &'static str, probability: f64, rng: &mut dyn RandomSource) -> bool {
    let draw = rng.unit();
    let triggered = draw < probability;
    if triggered {
        logging::gate_triggered(name, draw, probability);
    }
    triggered
}

fn check_probability(gate: &'static str, probability: f64) -> Result<f64, ImpairmentError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(ImpairmentError::InvalidProbability { gate, probability })
    }
}

#[derive(Debug, ThisError, Clone, Copy, PartialEq)]
pub enum ImpairmentError {
    #[error("The {gate} probability {probability} is outside [0, 1]")]
    InvalidProbability {
        gate: &'static str,
        probability: f64,
    },
}
