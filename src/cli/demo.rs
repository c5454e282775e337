//! Scripted walkthrough of a dispatch day

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};

use crate::config::Config;
use crate::core::SystemClock;
use crate::engine::Severity;
use crate::session::Session;
use crate::sim::{SimEvent, Simulation};
use crate::store::ClientRecord;
use crate::view::ConsoleProjector;

/// Clients "uploaded" halfway through the demo
pub fn demo_upload() -> Vec<ClientRecord> {
    vec![
        ClientRecord {
            name: "New Client 1".to_string(),
            phone: "9876543215".to_string(),
            email: None,
            address: "New Address 1, Bangalore".to_string(),
            latitude: 12.9700,
            longitude: 77.5800,
            priority: Some(2),
        },
        ClientRecord {
            name: "New Client 2".to_string(),
            phone: "9876543216".to_string(),
            email: None,
            address: "New Address 2, Bangalore".to_string(),
            latitude: 12.9800,
            longitude: 77.5900,
            priority: Some(1),
        },
    ]
}

struct Demo {
    session: Session<ConsoleProjector>,
    events: mpsc::UnboundedReceiver<SimEvent>,
    connected: bool,
}

impl Demo {
    /// Wait out a simulated delay while background timers keep firing
    async fn pause(&mut self, delay: Duration) {
        let deadline = Instant::now() + delay;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                Some(event) = self.events.recv() => self.on_event(event),
            }
        }
        self.flush();
    }

    fn on_event(&mut self, event: SimEvent) {
        match event {
            SimEvent::Activity(message) => {
                if self.session.is_logged_in() {
                    self.session.notify(message, Severity::Info);
                }
            }
            SimEvent::Connection { connected } => {
                self.connected = connected;
                println!(
                    "(connection: {})",
                    if connected { "connected" } else { "disconnected" }
                );
            }
        }
    }

    fn flush(&mut self) {
        for n in self.session.take_notifications() {
            println!("[{}] {}", n.severity.as_str(), n.message);
        }
    }
}

pub async fn run(config: &Config, json: bool) -> Result<()> {
    let sim = &config.simulation;
    let session = Session::from_config(config, Arc::new(SystemClock), ConsoleProjector { json });
    let (mut simulation, events) = Simulation::spawn(sim);

    let mut demo = Demo {
        session,
        events,
        connected: true,
    };

    tracing::info!("Starting demo");

    let _ = demo.session.login("manager1", "password");
    demo.pause(Duration::ZERO).await;

    demo.pause(sim.auto_assign_delay()).await;
    let _ = demo.session.auto_assign();
    demo.pause(Duration::ZERO).await;

    demo.pause(sim.upload_delay()).await;
    let _ = demo.session.upload_clients("demo_clients.json", &demo_upload());
    demo.pause(Duration::ZERO).await;

    demo.pause(sim.auto_assign_delay()).await;
    let _ = demo.session.auto_assign_all();
    demo.session.logout();
    demo.pause(Duration::ZERO).await;

    let _ = demo.session.login("agent2", "password");
    let _ = demo.session.start_current();
    let _ = demo.session.accept_current();
    let _ = demo.session.start_current();
    let _ = demo.session.share_location(12.9690, 77.6010, Some(15.0));
    let _ = demo.session.complete_current(Some("Visited, all good".to_string()));
    let _ = demo.session.complete_current(None);
    demo.session.logout();
    demo.pause(Duration::ZERO).await;

    let _ = demo.session.login("manager1", "password");
    demo.pause(sim.refresh_delay()).await;
    let _ = demo.session.refresh();
    demo.pause(Duration::ZERO).await;

    simulation.stop();
    tracing::info!(
        "Demo finished (connection was {} at the end)",
        if demo.connected { "up" } else { "down" }
    );
    Ok(())
}
