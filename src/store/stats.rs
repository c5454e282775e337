//! Dashboard rollup counters

use serde::{Deserialize, Serialize};

use super::models::{Assignment, Client, ClientStatus, User};

/// How the store answers statistics reads
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatisticsMode {
    /// Return the counters patched by each engine operation
    #[default]
    Incremental,
    /// Rebuild the counters from the collections on every read
    Recompute,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Statistics {
    pub total_clients: u32,
    pub pending_clients: u32,
    pub active_agents: u32,
    pub active_assignments: u32,
}

impl Statistics {
    /// Derive every counter from ground truth
    pub fn recompute(users: &[User], clients: &[Client], assignments: &[Assignment]) -> Self {
        Self {
            total_clients: clients.len() as u32,
            pending_clients: clients
                .iter()
                .filter(|c| c.status == ClientStatus::Pending)
                .count() as u32,
            active_agents: users.iter().filter(|u| u.is_agent() && u.active).count() as u32,
            active_assignments: assignments.iter().filter(|a| a.is_open()).count() as u32,
        }
    }

    pub(crate) fn record_assignment_created(&mut self) {
        self.pending_clients = self.pending_clients.saturating_sub(1);
        self.active_assignments += 1;
    }

    pub(crate) fn record_assignment_completed(&mut self) {
        self.active_assignments = self.active_assignments.saturating_sub(1);
    }

    pub(crate) fn record_clients_added(&mut self, count: u32) {
        self.total_clients += count;
        self.pending_clients += count;
    }
}

/// Signed difference between cached counters and recomputed ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatisticsDrift {
    pub total_clients: i64,
    pub pending_clients: i64,
    pub active_agents: i64,
    pub active_assignments: i64,
}

impl StatisticsDrift {
    pub fn between(cached: &Statistics, actual: &Statistics) -> Self {
        Self {
            total_clients: cached.total_clients as i64 - actual.total_clients as i64,
            pending_clients: cached.pending_clients as i64 - actual.pending_clients as i64,
            active_agents: cached.active_agents as i64 - actual.active_agents as i64,
            active_assignments: cached.active_assignments as i64
                - actual.active_assignments as i64,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
