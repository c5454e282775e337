//! Where projected dashboards go after each change

use std::fmt::Write as _;

use super::dashboard::{AgentView, DashboardView, ManagerView};

/// Receives a full dashboard after every state change
pub trait Projector {
    fn render(&mut self, view: &DashboardView);

    /// Nobody is logged in any more
    fn clear(&mut self) {}
}

/// Prints dashboards to stdout as text
#[derive(Debug, Default)]
pub struct ConsoleProjector {
    /// Emit JSON instead of text
    pub json: bool,
}

impl Projector for ConsoleProjector {
    fn render(&mut self, view: &DashboardView) {
        if self.json {
            match serde_json::to_string_pretty(view) {
                Ok(s) => println!("{}", s),
                Err(e) => tracing::warn!("Failed to serialize dashboard: {}", e),
            }
        } else {
            println!("{}", render_text(view));
        }
    }

    fn clear(&mut self) {
        println!("Logged out");
    }
}

/// Keeps every dashboard it was handed
#[derive(Debug, Default)]
pub struct RecordingProjector {
    renders: Vec<DashboardView>,
    clears: usize,
}

impl RecordingProjector {
    pub fn renders(&self) -> &[DashboardView] {
        &self.renders
    }

    pub fn last(&self) -> Option<&DashboardView> {
        self.renders.last()
    }

    pub fn count(&self) -> usize {
        self.renders.len()
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Projector for RecordingProjector {
    fn render(&mut self, view: &DashboardView) {
        self.renders.push(view.clone());
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

pub fn render_text(view: &DashboardView) -> String {
    match view {
        DashboardView::Manager(m) => render_manager(m),
        DashboardView::Agent(a) => render_agent(a),
    }
}

fn render_manager(view: &ManagerView) -> String {
    let mut out = String::new();
    let s = &view.statistics;

    let _ = writeln!(out, "== Manager dashboard ==");
    let _ = writeln!(
        out,
        "Clients: {} total, {} pending | Agents: {} active | Assignments: {} active",
        s.total_clients, s.pending_clients, s.active_agents, s.active_assignments
    );

    let _ = writeln!(out, "\nAgents");
    for agent in &view.agents {
        let status = if agent.busy { "busy" } else { "available" };
        let _ = write!(out, "  [{}] {} ({}) - {}", agent.id, agent.username, agent.phone, status);
        if let Some(client) = &agent.current_client {
            let _ = write!(out, ", assigned to {}", client);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nAssignments");
    if view.assignments.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for row in &view.assignments {
        let _ = writeln!(
            out,
            "  #{} {} -> {} [{}] {}",
            row.id, row.agent, row.client, row.status, row.assigned
        );
    }

    let _ = writeln!(out, "\nPending clients");
    if view.assignable_clients.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for choice in &view.assignable_clients {
        let _ = writeln!(out, "  [{}] {}", choice.id, choice.label);
    }

    out
}

fn render_agent(view: &AgentView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Agent dashboard: {} ==", view.username);
    match &view.current {
        Some(c) => {
            let _ = writeln!(out, "Current assignment #{}", c.assignment_id);
            let _ = writeln!(out, "  Client:   {}", c.client_name);
            let _ = writeln!(out, "  Address:  {}", c.address);
            let _ = writeln!(out, "  Phone:    {}", c.phone);
            let _ = writeln!(out, "  Priority: {}", c.priority);
            let _ = writeln!(out, "  Status:   {}", c.status);
            if let Some(d) = c.distance_km {
                let _ = writeln!(out, "  Distance: {:.2} km", d);
            }
        }
        None => {
            let _ = writeln!(out, "No active assignment");
        }
    }

    let _ = writeln!(out, "\nHistory");
    for row in &view.history {
        let completed = row
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  #{} {} ({}) [{}] assigned {} completed {}",
            row.assignment_id,
            row.client,
            row.address,
            row.status,
            row.assigned_at.format("%Y-%m-%d %H:%M"),
            completed
        );
    }

    out
}
