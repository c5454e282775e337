//! Random background activity messages

use rand::Rng;

pub const ACTIVITY_MESSAGES: [&str; 4] = [
    "New client request received",
    "Agent location updated",
    "Assignment status changed",
    "Client contacted successfully",
];

/// Emits a canned activity message with a fixed chance per tick
#[derive(Debug, Clone)]
pub struct ActivityTicker {
    probability: f64,
}

impl ActivityTicker {
    /// Out-of-range chances are clamped; NaN never fires
    pub fn new(probability: f64) -> Self {
        Self {
            probability: if probability.is_nan() {
                0.0
            } else {
                probability.clamp(0.0, 1.0)
            },
        }
    }

    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        if !rng.gen_bool(self.probability) {
            return None;
        }
        Some(ACTIVITY_MESSAGES[rng.gen_range(0..ACTIVITY_MESSAGES.len())])
    }
}
