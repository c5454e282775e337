// Tests for the dashboard projections

use chrono::{DateTime, Duration, TimeZone, Utc};
use fieldops::store::{seed, ClientStatus, EntityStore, StatisticsMode};
use fieldops::view::dashboard::{project_agent, project_manager, status_color, time_ago};
use fieldops::view::{project, render_text, DashboardView, MarkerKind};

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 29, 12, 0, 0).unwrap()
}

fn create_store() -> EntityStore {
    seed::demo_store(start_time(), StatisticsMode::Incremental)
}

#[test]
fn test_nobody_logged_in() {
    let store = create_store();
    assert!(project(&store, None, start_time()).is_none());
}

#[test]
fn test_manager_view_over_demo_data() {
    let store = create_store();
    let view = project_manager(&store, start_time());

    assert_eq!(view.statistics.total_clients, 5);
    assert_eq!(view.statistics.pending_clients, 3);
    assert_eq!(view.statistics.active_agents, 2);
    assert_eq!(view.statistics.active_assignments, 1);

    assert_eq!(view.agents.len(), 2);
    let agent1 = view.agents.iter().find(|a| a.username == "agent1").unwrap();
    assert!(agent1.busy);
    assert_eq!(agent1.current_client.as_deref(), Some("Jane Smith"));
    let agent2 = view.agents.iter().find(|a| a.username == "agent2").unwrap();
    assert!(!agent2.busy);
    assert!(agent2.current_client.is_none());

    assert_eq!(view.assignments.len(), 2);
    assert_eq!(view.assignments[0].assigned, "1h ago");
    assert_eq!(view.assignments[1].assigned, "3h ago");

    // Two agents with a known position plus every client
    let agents = view
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::Agent)
        .count();
    assert_eq!(agents, 2);
    assert_eq!(view.markers.len(), 7);

    // The form offers busy agents too, but only pending clients
    assert_eq!(view.assignable_agents.len(), 2);
    let client_ids: Vec<u32> = view.assignable_clients.iter().map(|c| c.id).collect();
    assert_eq!(client_ids, vec![1, 4, 5]);
    assert_eq!(
        view.assignable_clients[0].label,
        "John Doe - 123 Main St, Bangalore"
    );
}

#[test]
fn test_client_markers_follow_status() {
    let store = create_store();
    let view = project_manager(&store, start_time());

    let color_of = |name: &str| {
        view.markers
            .iter()
            .find(|m| m.kind == MarkerKind::Client && m.label == name)
            .map(|m| m.color)
    };
    assert_eq!(color_of("John Doe"), Some("red"));
    assert_eq!(color_of("Jane Smith"), Some("orange"));
    assert_eq!(color_of("Bob Wilson"), Some("green"));
}

#[test]
fn test_agent_view_with_current_assignment() {
    let store = create_store();
    let agent = store.find_user_by_username("agent1").unwrap();
    let view = project_agent(&store, agent);

    let current = view.current.unwrap();
    assert_eq!(current.assignment_id, 1);
    assert_eq!(current.client_name, "Jane Smith");
    assert_eq!(current.priority, "Medium");
    let distance = current.distance_km.unwrap();
    assert!(distance > 1.0 && distance < 2.0, "distance {}", distance);

    assert_eq!(view.history.len(), 1);
    // Own position and the current client
    assert_eq!(view.markers.len(), 2);
    assert_eq!(view.markers[0].label, "Your Location");
}

#[test]
fn test_agent_view_without_current_assignment() {
    let store = create_store();
    let agent = store.find_user_by_username("agent2").unwrap();
    let view = project_agent(&store, agent);

    assert!(view.current.is_none());
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].client, "Bob Wilson");
    assert!(view.history[0].completed_at.is_some());
    assert_eq!(view.markers.len(), 1);
}

#[test]
fn test_agent_without_position_has_no_distance() {
    let store = create_store();
    let mut agent = store.find_user(2).unwrap().clone();
    agent.location = None;

    let view = project_agent(&store, &agent);
    assert!(view.current.unwrap().distance_km.is_none());
    assert!(view.markers.iter().all(|m| m.kind == MarkerKind::Client));
}

#[test]
fn test_status_colors() {
    assert_eq!(status_color(ClientStatus::Pending), "red");
    assert_eq!(status_color(ClientStatus::Assigned), "orange");
    assert_eq!(status_color(ClientStatus::Completed), "green");
}

#[test]
fn test_time_ago() {
    let now = start_time();
    assert_eq!(time_ago(now, now), "0m ago");
    assert_eq!(time_ago(now, now - Duration::minutes(59)), "59m ago");
    assert_eq!(time_ago(now, now - Duration::minutes(61)), "1h ago");
    assert_eq!(time_ago(now, now - Duration::hours(26)), "26h ago");
    // Clock skew never shows a negative age
    assert_eq!(time_ago(now, now + Duration::minutes(5)), "0m ago");
}

#[test]
fn test_views_serialize_with_dashboard_tag() {
    let store = create_store();
    let manager = store.find_user(1).unwrap();
    let view = project(&store, Some(manager), start_time()).unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["dashboard"], "manager");
    assert_eq!(json["statistics"]["pending_clients"], 3);
    assert_eq!(json["assignments"][0]["status"], "in_progress");
}

#[test]
fn test_render_text() {
    let store = create_store();
    let agent = store.find_user(2).unwrap().clone();

    let manager_text = render_text(&DashboardView::Manager(project_manager(&store, start_time())));
    assert!(manager_text.contains("Manager dashboard"));
    assert!(manager_text.contains("Jane Smith"));

    let agent_text = render_text(&DashboardView::Agent(project_agent(&store, &agent)));
    assert!(agent_text.contains("Jane Smith"));
    assert!(agent_text.contains("Distance:"));
}
