//! Assignment engine
//!
//! Mediates every change to assignments and client status, and keeps the
//! store's statistics in step. Each operation validates everything up front
//! and only then mutates, so a failed call leaves the store untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::Clock;
use crate::store::{
    Assignment, AssignmentId, AssignmentStatus, Client, ClientId, ClientRecord, ClientStatus,
    EntityStore, ImportReport, Location, LocationLog, Priority, User, UserId,
};

use super::error::{EngineError, Result};
use super::lifecycle;
use super::matching::AssignmentStrategy;

pub struct AssignmentEngine {
    clock: Arc<dyn Clock>,
    strategy: AssignmentStrategy,
}

impl AssignmentEngine {
    pub fn new(clock: Arc<dyn Clock>, strategy: AssignmentStrategy) -> Self {
        Self { clock, strategy }
    }

    pub fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: AssignmentStrategy) {
        self.strategy = strategy;
    }

    /// Agents with no assignment short of completed
    pub fn available_agents<'a>(&self, store: &'a EntityStore) -> Vec<&'a User> {
        store
            .list_agents()
            .into_iter()
            .filter(|agent| store.open_assignment_for(agent.id).is_none())
            .collect()
    }

    pub fn is_available(&self, store: &EntityStore, agent_id: UserId) -> bool {
        store.open_assignment_for(agent_id).is_none()
    }

    /// Pair one pending client with one available agent
    pub fn auto_assign(&self, store: &mut EntityStore) -> Result<AssignmentId> {
        let (agent_id, client_id) = {
            let pending = store.list_pending_clients();
            if pending.is_empty() {
                warn!("Auto-assign: no pending clients");
                return Err(EngineError::NoPendingClients);
            }

            let available = self.available_agents(store);
            if available.is_empty() {
                warn!("Auto-assign: no available agents");
                return Err(EngineError::NoAvailableAgents);
            }

            let (client, agent) = self
                .strategy
                .select(&pending, &available)
                .ok_or(EngineError::NoAvailableAgents)?;

            debug!(
                "Auto-assign ({}) picked client {} for agent {}",
                self.strategy.as_str(),
                client.id,
                agent.id
            );
            (agent.id, client.id)
        };

        self.create_assignment(store, agent_id, client_id)
    }

    /// Keep auto-assigning until clients or agents run out
    ///
    /// Fails only when not even one assignment could be made.
    pub fn auto_assign_all(&self, store: &mut EntityStore) -> Result<Vec<AssignmentId>> {
        let mut created = Vec::new();

        loop {
            match self.auto_assign(store) {
                Ok(id) => created.push(id),
                Err(e) if created.is_empty() => return Err(e),
                Err(EngineError::NoPendingClients | EngineError::NoAvailableAgents) => break,
                Err(e) => {
                    warn!("Auto-assign stopped early: {}", e);
                    break;
                }
            }
        }

        info!("Auto-assigned {} clients", created.len());
        Ok(created)
    }

    /// Bind an agent to a pending client
    pub fn create_assignment(
        &self,
        store: &mut EntityStore,
        agent_id: UserId,
        client_id: ClientId,
    ) -> Result<AssignmentId> {
        let agent = store
            .find_user(agent_id)
            .ok_or(EngineError::AgentNotFound(agent_id))?;
        if !agent.is_agent() {
            return Err(EngineError::NotAnAgent(agent_id));
        }

        let client = store
            .find_client(client_id)
            .ok_or(EngineError::ClientNotFound(client_id))?;
        if client.status != ClientStatus::Pending {
            return Err(EngineError::ClientNotPending {
                client_id,
                status: client.status,
            });
        }

        if let Some(open) = store.open_assignment_for(agent_id) {
            return Err(EngineError::AgentBusy {
                agent_id,
                assignment_id: open.id,
            });
        }

        let agent_name = agent.username.clone();
        let client_name = client.name.clone();

        let id = store.append_assignment(Assignment {
            id: 0,
            agent_id,
            client_id,
            status: AssignmentStatus::Assigned,
            assigned_at: self.clock.now(),
            accepted_at: None,
            started_at: None,
            completed_at: None,
            notes: None,
        });

        if let Some(client) = store.find_client_mut(client_id) {
            client.status = ClientStatus::Assigned;
        }
        store.statistics_mut().record_assignment_created();

        info!(
            "Created assignment {}: {} -> {}",
            id, agent_name, client_name
        );
        Ok(id)
    }

    /// Move an assignment one step along its lifecycle
    ///
    /// `notes` are kept only when completing.
    pub fn advance_status(
        &self,
        store: &mut EntityStore,
        assignment_id: AssignmentId,
        to: AssignmentStatus,
        notes: Option<String>,
    ) -> Result<()> {
        let assignment = store
            .assignment(assignment_id)
            .ok_or(EngineError::AssignmentNotFound(assignment_id))?;

        if let Err(e) = lifecycle::check_transition(assignment, to) {
            warn!("Rejected transition: {}", e);
            return Err(e);
        }

        let from = assignment.status;
        let client_id = assignment.client_id;
        let now = self.clock.now();

        let assignment = store
            .assignment_mut(assignment_id)
            .ok_or(EngineError::AssignmentNotFound(assignment_id))?;
        assignment.status = to;
        match to {
            AssignmentStatus::Accepted => assignment.accepted_at = Some(now),
            AssignmentStatus::InProgress => assignment.started_at = Some(now),
            AssignmentStatus::Completed => {
                assignment.completed_at = Some(now);
                assignment.notes = notes;
            }
            AssignmentStatus::Assigned => {}
        }

        if to == AssignmentStatus::Completed {
            if let Some(client) = store.find_client_mut(client_id) {
                client.status = ClientStatus::Completed;
            }
            store.statistics_mut().record_assignment_completed();
        }

        info!("Assignment {}: {} -> {}", assignment_id, from, to);
        Ok(())
    }

    pub fn accept(&self, store: &mut EntityStore, assignment_id: AssignmentId) -> Result<()> {
        self.advance_status(store, assignment_id, AssignmentStatus::Accepted, None)
    }

    pub fn start(&self, store: &mut EntityStore, assignment_id: AssignmentId) -> Result<()> {
        self.advance_status(store, assignment_id, AssignmentStatus::InProgress, None)
    }

    pub fn complete(
        &self,
        store: &mut EntityStore,
        assignment_id: AssignmentId,
        notes: Option<String>,
    ) -> Result<()> {
        self.advance_status(store, assignment_id, AssignmentStatus::Completed, notes)
    }

    /// Append uploaded client rows as pending clients
    ///
    /// Rows missing a name, phone or address, or with coordinates out of
    /// range, are skipped and reported. Row numbers start at 2 to line up
    /// with a spreadsheet that has a header row.
    pub fn bulk_upload_clients(
        &self,
        store: &mut EntityStore,
        file_name: &str,
        records: &[ClientRecord],
        uploaded_by: Option<UserId>,
    ) -> Result<ImportReport> {
        if records.is_empty() {
            return Err(EngineError::MissingInput("client file"));
        }

        let now = self.clock.now();
        let mut accepted = Vec::new();
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match validate_record(record) {
                Ok(()) => accepted.push(Client {
                    id: 0,
                    name: record.name.trim().to_string(),
                    phone: record.phone.trim().to_string(),
                    email: record
                        .email
                        .as_deref()
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(str::to_string),
                    address: record.address.trim().to_string(),
                    location: Location::new(record.latitude, record.longitude),
                    priority: Priority::from_raw(record.priority),
                    status: ClientStatus::Pending,
                    created_at: now,
                }),
                Err(reason) => errors.push(format!("Row {}: {}", index + 2, reason)),
            }
        }

        let imported: Vec<_> = accepted
            .into_iter()
            .map(|client| store.append_client(client))
            .collect();
        store
            .statistics_mut()
            .record_clients_added(imported.len() as u32);

        let report = ImportReport {
            file_name: file_name.to_string(),
            total_rows: records.len(),
            imported,
            failed: errors.len(),
            errors,
            uploaded_by,
            uploaded_at: now,
        };

        if report.failed > 0 {
            warn!(
                "Import of {}: {} rows failed",
                report.file_name, report.failed
            );
        }
        info!(
            "Imported {} of {} clients from {}",
            report.imported.len(),
            report.total_rows,
            report.file_name
        );

        store.append_import_log(report.clone());
        Ok(report)
    }

    /// Record an agent's reported position
    pub fn share_location(
        &self,
        store: &mut EntityStore,
        agent_id: UserId,
        location: Location,
        accuracy: Option<f64>,
    ) -> Result<()> {
        if !location.is_valid() {
            return Err(EngineError::InvalidLocation {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        let now = self.clock.now();
        let agent = store
            .find_user_mut(agent_id)
            .ok_or(EngineError::AgentNotFound(agent_id))?;
        if !agent.is_agent() {
            return Err(EngineError::NotAnAgent(agent_id));
        }

        agent.location = Some(location);
        agent.last_location_update = Some(now);

        store.append_location_log(LocationLog {
            agent_id,
            location,
            accuracy,
            timestamp: now,
        });

        debug!(
            "Agent {} at {:.4}, {:.4}",
            agent_id, location.latitude, location.longitude
        );
        Ok(())
    }
}

fn validate_record(record: &ClientRecord) -> std::result::Result<(), String> {
    if record.name.trim().is_empty() {
        return Err("name is required".to_string());
    }
    if record.phone.trim().is_empty() {
        return Err("phone is required".to_string());
    }
    if record.address.trim().is_empty() {
        return Err("address is required".to_string());
    }
    let location = Location::new(record.latitude, record.longitude);
    if !location.is_valid() {
        return Err(format!(
            "invalid coordinates {}, {}",
            record.latitude, record.longitude
        ));
    }
    Ok(())
}
