// Tests for the simulated timers

use std::time::Duration;

use fieldops::config::SimulationConfig;
use fieldops::sim::{ActivityTicker, ConnectionMonitor, SimEvent, Simulation, ACTIVITY_MESSAGES};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_ticker_never_fires_at_zero() {
    let ticker = ActivityTicker::new(0.0);
    let mut rng = rng();
    assert!((0..100).all(|_| ticker.tick(&mut rng).is_none()));
}

#[test]
fn test_ticker_always_fires_at_one() {
    let ticker = ActivityTicker::new(1.0);
    let mut rng = rng();
    for _ in 0..20 {
        let message = ticker.tick(&mut rng).unwrap();
        assert!(ACTIVITY_MESSAGES.contains(&message));
    }
}

#[test]
fn test_ticker_clamps_probability() {
    let mut rng = rng();
    assert!(ActivityTicker::new(7.5).tick(&mut rng).is_some());
    assert!(ActivityTicker::new(-1.0).tick(&mut rng).is_none());
}

#[test]
fn test_nan_chances_do_not_panic() {
    let mut rng = rng();
    let ticker = ActivityTicker::new(f64::NAN);
    assert!((0..10).all(|_| ticker.tick(&mut rng).is_none()));

    let mut monitor = ConnectionMonitor::new(f64::NAN);
    assert!((0..10).all(|_| monitor.tick(&mut rng).is_none()));
    assert!(monitor.is_connected());
}

#[tokio::test]
async fn test_simulation_survives_nan_settings() {
    let (_sim, mut events) = Simulation::spawn(&fast_config(f64::NAN, f64::NAN));

    // Timers keep running, so the channel stays open and quiet
    let waited = tokio::time::timeout(Duration::from_millis(100), events.recv()).await;
    assert!(waited.is_err());
}

#[test]
fn test_connection_reports_changes_only() {
    let mut rng = rng();

    let mut always_up = ConnectionMonitor::new(1.0);
    assert!(always_up.is_connected());
    assert!((0..10).all(|_| always_up.tick(&mut rng).is_none()));

    let mut always_down = ConnectionMonitor::new(0.0);
    assert_eq!(always_down.tick(&mut rng), Some(false));
    assert!(!always_down.is_connected());
    assert_eq!(always_down.tick(&mut rng), None);
}

fn fast_config(activity_probability: f64, connection_uptime: f64) -> SimulationConfig {
    SimulationConfig {
        activity_interval_ms: 5,
        activity_probability,
        connection_interval_ms: 5,
        connection_uptime,
        ..SimulationConfig::default()
    }
}

#[tokio::test]
async fn test_simulation_emits_events() {
    let (mut sim, mut events) = Simulation::spawn(&fast_config(1.0, 1.0));

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(event, SimEvent::Activity(_)));

    sim.stop();
}

#[tokio::test]
async fn test_simulation_reports_disconnect() {
    let (_sim, mut events) = Simulation::spawn(&fast_config(0.0, 0.0));

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, SimEvent::Connection { connected: false });
}

#[tokio::test]
async fn test_stopped_simulation_closes_channel() {
    let (mut sim, mut events) = Simulation::spawn(&fast_config(1.0, 1.0));
    sim.stop();

    // Aborted timers drop their senders, so the channel drains and closes
    let closed = tokio::time::timeout(Duration::from_secs(2), async {
        while events.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
}
