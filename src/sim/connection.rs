//! Simulated connection status

use rand::Rng;

/// Connection that reads as up with probability `uptime` on each check
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    uptime: f64,
    connected: bool,
}

impl ConnectionMonitor {
    /// Out-of-range uptime is clamped; NaN reads as always up
    pub fn new(uptime: f64) -> Self {
        Self {
            uptime: if uptime.is_nan() {
                1.0
            } else {
                uptime.clamp(0.0, 1.0)
            },
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Re-roll the status; returns the new value only when it changed
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<bool> {
        let connected = rng.gen_bool(self.uptime);
        if connected == self.connected {
            return None;
        }
        self.connected = connected;
        Some(connected)
    }
}
