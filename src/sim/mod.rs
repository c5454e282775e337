//! Simulated real-time updates driven by timers

pub mod connection;
pub mod ticker;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::config::SimulationConfig;

pub use connection::ConnectionMonitor;
pub use ticker::{ActivityTicker, ACTIVITY_MESSAGES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Activity(&'static str),
    Connection { connected: bool },
}

/// Background timers feeding [`SimEvent`]s into a channel
///
/// Timers stop when this is dropped.
pub struct Simulation {
    handles: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn spawn(config: &SimulationConfig) -> (Self, mpsc::UnboundedReceiver<SimEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let ticker = ActivityTicker::new(config.activity_probability);
        let activity = spawn_timer(config.activity_interval(), tx.clone(), move |rng| {
            ticker.tick(rng).map(SimEvent::Activity)
        });

        let mut monitor = ConnectionMonitor::new(config.connection_uptime);
        let connection = spawn_timer(config.connection_interval(), tx, move |rng| {
            monitor
                .tick(rng)
                .map(|connected| SimEvent::Connection { connected })
        });

        (
            Self {
                handles: vec![activity, connection],
            },
            rx,
        )
    }

    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        debug!("Simulation timers stopped");
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_timer<F>(
    period: Duration,
    tx: mpsc::UnboundedSender<SimEvent>,
    mut on_tick: F,
) -> JoinHandle<()>
where
    F: FnMut(&mut StdRng) -> Option<SimEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut timer = interval(period.max(Duration::from_millis(1)));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; the first real tick is one period out
        timer.tick().await;

        loop {
            timer.tick().await;
            if let Some(event) = on_tick(&mut rng) {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    })
}
