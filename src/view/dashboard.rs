//! Store state projected into what each dashboard shows

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::{
    Assignment, AssignmentId, AssignmentStatus, Client, ClientId, ClientStatus, EntityStore,
    Location, Role, Statistics, User, UserId,
};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "dashboard", rename_all = "lowercase")]
pub enum DashboardView {
    Manager(ManagerView),
    Agent(AgentView),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ManagerView {
    pub statistics: Statistics,
    pub agents: Vec<AgentCard>,
    pub assignments: Vec<AssignmentRow>,
    pub markers: Vec<MapMarker>,
    /// Choices offered by the manual-assign form
    pub assignable_agents: Vec<Choice>,
    pub assignable_clients: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentCard {
    pub id: UserId,
    pub username: String,
    pub phone: String,
    pub busy: bool,
    pub current_client: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssignmentRow {
    pub id: AssignmentId,
    pub agent: String,
    pub client: String,
    pub status: AssignmentStatus,
    pub assigned: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Agent,
    Client,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub label: String,
    pub location: Location,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Choice {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentView {
    pub agent_id: UserId,
    pub username: String,
    pub current: Option<CurrentAssignment>,
    pub history: Vec<HistoryRow>,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurrentAssignment {
    pub assignment_id: AssignmentId,
    pub client_id: ClientId,
    pub client_name: String,
    pub address: String,
    pub phone: String,
    pub priority: &'static str,
    pub status: AssignmentStatus,
    /// Straight-line distance from the agent, when the agent's position is known
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryRow {
    pub assignment_id: AssignmentId,
    pub client: String,
    pub address: String,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Build the dashboard for `viewer`; `None` when nobody is logged in
pub fn project(
    store: &EntityStore,
    viewer: Option<&User>,
    now: DateTime<Utc>,
) -> Option<DashboardView> {
    let viewer = viewer?;
    Some(match viewer.role {
        Role::Manager => DashboardView::Manager(project_manager(store, now)),
        Role::Agent => DashboardView::Agent(project_agent(store, viewer)),
    })
}

pub fn project_manager(store: &EntityStore, now: DateTime<Utc>) -> ManagerView {
    let agents = store
        .list_agents()
        .into_iter()
        .map(|agent| {
            let open = store.open_assignment_for(agent.id);
            AgentCard {
                id: agent.id,
                username: agent.username.clone(),
                phone: agent.phone.clone().unwrap_or_default(),
                busy: open.is_some(),
                current_client: open.and_then(|a| client_name(store, a)),
            }
        })
        .collect();

    let assignments = store
        .assignments()
        .iter()
        .map(|a| AssignmentRow {
            id: a.id,
            agent: store
                .find_user(a.agent_id)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            client: client_name(store, a).unwrap_or_else(|| UNKNOWN.to_string()),
            status: a.status,
            assigned: time_ago(now, a.assigned_at),
        })
        .collect();

    let mut markers: Vec<MapMarker> = store
        .list_agents()
        .into_iter()
        .filter_map(agent_marker)
        .collect();
    markers.extend(store.clients().iter().map(client_marker));

    // The manual-assign form lists every agent, not only available ones
    let assignable_agents = store
        .list_agents()
        .into_iter()
        .map(|a| Choice {
            id: a.id,
            label: a.username.clone(),
        })
        .collect();
    let assignable_clients = store
        .list_pending_clients()
        .into_iter()
        .map(|c| Choice {
            id: c.id,
            label: format!("{} - {}", c.name, c.address),
        })
        .collect();

    ManagerView {
        statistics: store.statistics(),
        agents,
        assignments,
        markers,
        assignable_agents,
        assignable_clients,
    }
}

pub fn project_agent(store: &EntityStore, agent: &User) -> AgentView {
    let open = store.open_assignment_for(agent.id);
    let open_client = open.and_then(|a| store.find_client(a.client_id).map(|c| (a, c)));

    let current = open_client.map(|(a, c)| CurrentAssignment {
        assignment_id: a.id,
        client_id: c.id,
        client_name: c.name.clone(),
        address: c.address.clone(),
        phone: c.phone.clone(),
        priority: c.priority.label(),
        status: a.status,
        distance_km: agent.location.map(|loc| loc.distance_km(&c.location)),
    });

    let history = store
        .assignments_for(agent.id)
        .into_iter()
        .map(|a| {
            let client = store.find_client(a.client_id);
            HistoryRow {
                assignment_id: a.id,
                client: client.map(|c| c.name.clone()).unwrap_or_else(|| UNKNOWN.to_string()),
                address: client
                    .map(|c| c.address.clone())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                status: a.status,
                assigned_at: a.assigned_at,
                completed_at: a.completed_at,
            }
        })
        .collect();

    let mut markers = Vec::new();
    if let Some(location) = agent.location {
        markers.push(MapMarker {
            kind: MarkerKind::Agent,
            label: "Your Location".to_string(),
            location,
            color: "blue",
        });
    }
    if let Some((_, client)) = open_client {
        markers.push(client_marker(client));
    }

    AgentView {
        agent_id: agent.id,
        username: agent.username.clone(),
        current,
        history,
        markers,
    }
}

fn client_name(store: &EntityStore, assignment: &Assignment) -> Option<String> {
    store.find_client(assignment.client_id).map(|c| c.name.clone())
}

fn agent_marker(agent: &User) -> Option<MapMarker> {
    Some(MapMarker {
        kind: MarkerKind::Agent,
        label: agent.username.clone(),
        location: agent.location?,
        color: "blue",
    })
}

fn client_marker(client: &Client) -> MapMarker {
    MapMarker {
        kind: MarkerKind::Client,
        label: client.name.clone(),
        location: client.location,
        color: status_color(client.status),
    }
}

/// Map pin colour for a client status
pub fn status_color(status: ClientStatus) -> &'static str {
    match status {
        ClientStatus::Pending => "red",
        ClientStatus::Assigned => "orange",
        ClientStatus::Completed => "green",
    }
}

/// "3h ago" once past the hour, "12m ago" before that
pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        format!("{}h ago", hours)
    } else {
        format!("{}m ago", minutes)
    }
}
