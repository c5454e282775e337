// Tests for the dashboard session

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fieldops::config::Config;
use fieldops::core::{Clock, ManualClock};
use fieldops::engine::{AssignmentStrategy, EngineError, Severity};
use fieldops::session::Session;
use fieldops::store::{AssignmentStatus, ClientRecord, ClientStatus, Role};
use fieldops::view::{DashboardView, RecordingProjector};

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 29, 12, 0, 0).unwrap()
}

fn create_session() -> (Session<RecordingProjector>, Arc<ManualClock>) {
    create_session_with(Config::default())
}

fn create_session_with(config: Config) -> (Session<RecordingProjector>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let session = Session::from_config(&config, clock.clone(), RecordingProjector::default());
    (session, clock)
}

fn last_message(session: &Session<RecordingProjector>) -> (String, Severity) {
    let n = session.notifications().last().unwrap();
    (n.message.clone(), n.severity)
}

#[test]
fn test_login_requires_username_and_password() {
    let (mut session, _clock) = create_session();

    let err = session.login("manager1", "").unwrap_err();
    assert!(matches!(err, EngineError::MissingInput(_)));
    assert!(!session.is_logged_in());
    assert_eq!(last_message(&session).1, Severity::Error);
    assert_eq!(session.projector().count(), 0);
}

#[test]
fn test_login_unknown_user() {
    let (mut session, _clock) = create_session();

    let err = session.login("nobody", "password").unwrap_err();
    assert!(matches!(err, EngineError::InvalidCredentials(_)));
    assert!(!session.is_logged_in());
}

#[test]
fn test_login_renders_dashboard_for_role() {
    let (mut session, _clock) = create_session();

    assert_eq!(session.login("manager1", "anything").unwrap(), Role::Manager);
    assert_eq!(
        last_message(&session),
        ("Logged in successfully as manager".to_string(), Severity::Success)
    );
    assert!(matches!(
        session.projector().last(),
        Some(DashboardView::Manager(_))
    ));

    session.logout();
    assert!(!session.is_logged_in());
    assert_eq!(session.projector().clears(), 1);

    assert_eq!(session.login("agent1", "x").unwrap(), Role::Agent);
    assert!(matches!(
        session.projector().last(),
        Some(DashboardView::Agent(_))
    ));
}

#[test]
fn test_manager_actions_need_a_manager() {
    let (mut session, _clock) = create_session();

    assert!(matches!(session.auto_assign(), Err(EngineError::NotLoggedIn)));

    session.login("agent2", "password").unwrap();
    let err = session.auto_assign().unwrap_err();
    assert!(matches!(
        err,
        EngineError::WrongRole {
            required: Role::Manager,
            actual: Role::Agent
        }
    ));
    assert_eq!(session.store().assignments().len(), 2);
}

#[test]
fn test_auto_assign_notifies_and_rerenders() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();
    let renders = session.projector().count();

    let id = session.auto_assign().unwrap();

    assert_eq!(
        last_message(&session),
        ("Assigned John Doe to agent2".to_string(), Severity::Success)
    );
    assert_eq!(session.projector().count(), renders + 1);

    let Some(DashboardView::Manager(view)) = session.projector().last() else {
        panic!("expected manager view");
    };
    assert_eq!(view.statistics.active_assignments, 2);
    assert_eq!(view.statistics.pending_clients, 2);
    assert!(view.assignments.iter().any(|row| row.id == id));
}

#[test]
fn test_auto_assign_with_no_available_agents_warns_without_rendering() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();
    session.auto_assign().unwrap();
    let renders = session.projector().count();

    let err = session.auto_assign().unwrap_err();
    assert!(matches!(err, EngineError::NoAvailableAgents));
    assert_eq!(
        last_message(&session),
        (
            "No available agents for assignment".to_string(),
            Severity::Warning
        )
    );
    assert_eq!(session.projector().count(), renders);
}

#[test]
fn test_manual_assign_to_busy_agent_is_refused() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();

    // agent1 (id 2) is already on Jane Smith
    let err = session.manual_assign(2, 4).unwrap_err();
    assert!(matches!(err, EngineError::AgentBusy { .. }));
    assert_eq!(
        session.store().find_client(4).unwrap().status,
        ClientStatus::Pending
    );

    let id = session.manual_assign(3, 4).unwrap();
    assert_eq!(
        last_message(&session).0,
        "Manually assigned Alice Johnson to agent2"
    );
    assert_eq!(session.store().assignment(id).unwrap().client_id, 4);
}

#[test]
fn test_manual_assign_unknown_ids() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();

    assert!(matches!(
        session.manual_assign(3, 77),
        Err(EngineError::ClientNotFound(77))
    ));
    assert_eq!(last_message(&session).1, Severity::Error);
}

#[test]
fn test_upload_clients() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();
    let before = session.store().statistics();

    let records: Vec<ClientRecord> = serde_json::from_str(
        r#"[
            {"name": "New Client 1", "phone": "9876543215", "address": "New Address 1, Bangalore",
             "latitude": 12.97, "longitude": 77.58, "priority": 2},
            {"name": "New Client 2", "phone": "9876543216", "address": "New Address 2, Bangalore",
             "latitude": 12.98, "longitude": 77.59}
        ]"#,
    )
    .unwrap();

    let report = session.upload_clients("clients.json", &records).unwrap();
    assert_eq!(report.imported, vec![6, 7]);
    assert_eq!(report.uploaded_by, Some(1));

    let after = session.store().statistics();
    assert_eq!(after.total_clients, before.total_clients + 2);
    assert_eq!(after.pending_clients, before.pending_clients + 2);
    assert_eq!(
        last_message(&session).0,
        "Successfully uploaded 2 new clients"
    );
}

#[test]
fn test_upload_without_records() {
    let (mut session, _clock) = create_session();
    session.login("manager1", "password").unwrap();

    let err = session.upload_clients("none.json", &[]).unwrap_err();
    assert!(matches!(err, EngineError::MissingInput(_)));
    assert_eq!(session.store().clients().len(), 5);
}

#[test]
fn test_agent_lifecycle_through_session() {
    let (mut session, clock) = create_session();
    session.login("manager1", "password").unwrap();
    let id = session.auto_assign().unwrap();
    session.logout();

    session.login("agent2", "password").unwrap();
    assert_eq!(session.current_assignment_id(), Some(id));

    // Skipping accept is refused and changes nothing
    let err = session.start_current().unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert_eq!(last_message(&session).1, Severity::Warning);

    session.accept_current().unwrap();
    assert_eq!(
        last_message(&session).0,
        "Assignment accepted successfully"
    );
    session.start_current().unwrap();
    clock.advance(Duration::minutes(30));
    let active = session.store().statistics().active_assignments;
    session
        .complete_current(Some("All done".to_string()))
        .unwrap();

    let a = session.store().assignment(id).unwrap();
    assert_eq!(a.status, AssignmentStatus::Completed);
    assert_eq!(a.completed_at, Some(start_time() + Duration::minutes(30)));
    assert_eq!(
        session.store().find_client(a.client_id).unwrap().status,
        ClientStatus::Completed
    );
    assert_eq!(session.store().statistics().active_assignments, active - 1);

    // Nothing left to complete
    let err = session.complete_current(None).unwrap_err();
    assert!(matches!(err, EngineError::NoCurrentAssignment));
    assert_eq!(
        last_message(&session),
        ("No current assignment".to_string(), Severity::Warning)
    );
    assert_eq!(session.store().statistics().active_assignments, active - 1);

    let Some(DashboardView::Agent(view)) = session.projector().last() else {
        panic!("expected agent view");
    };
    assert!(view.current.is_none());
    assert_eq!(view.history.len(), 2);
}

#[test]
fn test_share_location_through_session() {
    let (mut session, _clock) = create_session();
    session.login("agent1", "password").unwrap();

    session.share_location(12.9690, 77.6010, None).unwrap();
    assert_eq!(
        last_message(&session).0,
        "Location updated successfully"
    );
    let agent = session.store().find_user(2).unwrap();
    assert_eq!(agent.location.unwrap().latitude, 12.9690);

    session.logout();
    session.login("manager1", "password").unwrap();
    assert!(matches!(
        session.share_location(1.0, 1.0, None),
        Err(EngineError::WrongRole { .. })
    ));
}

#[test]
fn test_refresh_renders_current_view() {
    let (mut session, _clock) = create_session();
    assert!(matches!(session.refresh(), Err(EngineError::NotLoggedIn)));

    session.login("manager1", "password").unwrap();
    let renders = session.projector().count();
    session.refresh().unwrap();
    assert_eq!(session.projector().count(), renders + 1);
    assert_eq!(last_message(&session).0, "Data refreshed successfully");
}

#[test]
fn test_strategy_from_config() {
    let mut config = Config::default();
    config.assignment.strategy = AssignmentStrategy::Priority;
    let (mut session, _clock) = create_session_with(config);
    session.login("manager1", "password").unwrap();

    let id = session.auto_assign().unwrap();
    assert_eq!(session.store().assignment(id).unwrap().client_id, 5);
}

#[test]
fn test_empty_store_when_seeding_disabled() {
    let mut config = Config::default();
    config.seed_demo_data = false;
    let (mut session, _clock) = create_session_with(config);

    assert!(session.store().users().is_empty());
    assert!(matches!(
        session.login("manager1", "password"),
        Err(EngineError::InvalidCredentials(_))
    ));
}

#[test]
fn test_notifications_expire_and_drain() {
    let (mut session, clock) = create_session();
    session.login("manager1", "password").unwrap();
    session.auto_assign().unwrap();

    let fresh = session.take_notifications();
    assert_eq!(fresh.len(), 3);
    assert!(session.take_notifications().is_empty());

    assert_eq!(session.notifications().active(clock.now()).len(), 3);
    clock.advance(Duration::seconds(6));
    assert!(session.notifications().active(clock.now()).is_empty());
}

#[test]
fn test_delivered_notifications_are_pruned_once_expired() {
    let (mut session, clock) = create_session();
    session.login("manager1", "password").unwrap();
    session.take_notifications();
    assert_eq!(session.notifications().all().len(), 1);

    // Expired but never delivered: still handed out
    clock.advance(Duration::seconds(6));
    session.refresh().unwrap();
    clock.advance(Duration::seconds(6));
    assert_eq!(session.take_notifications().len(), 2);

    assert!(session.notifications().all().is_empty());
    assert!(session.take_notifications().is_empty());

    // Fresh messages survive the prune until they expire
    session.refresh().unwrap();
    session.take_notifications();
    assert_eq!(session.notifications().all().len(), 2);
}
