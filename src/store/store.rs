//! In-memory entity store

use super::models::{
    Assignment, AssignmentId, Client, ClientId, ClientStatus, ImportReport, LocationLog, Role,
    User, UserId,
};
use super::stats::{Statistics, StatisticsDrift, StatisticsMode};

/// Users, clients and assignments plus their rollup counters
///
/// Lookups return `None` on a miss. Appends hand out the next id as
/// `len + 1`; nothing is ever removed so ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    users: Vec<User>,
    clients: Vec<Client>,
    assignments: Vec<Assignment>,
    location_logs: Vec<LocationLog>,
    import_logs: Vec<ImportReport>,
    statistics: Statistics,
    stats_mode: StatisticsMode,
}

impl EntityStore {
    /// Empty store
    pub fn new(stats_mode: StatisticsMode) -> Self {
        Self {
            stats_mode,
            ..Self::default()
        }
    }

    /// Store holding the given records, with counters derived from them
    pub fn with_records(
        users: Vec<User>,
        clients: Vec<Client>,
        assignments: Vec<Assignment>,
        stats_mode: StatisticsMode,
    ) -> Self {
        let statistics = Statistics::recompute(&users, &clients, &assignments);
        Self {
            users,
            clients,
            assignments,
            location_logs: Vec::new(),
            import_logs: Vec::new(),
            statistics,
            stats_mode,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn location_logs(&self) -> &[LocationLog] {
        &self.location_logs
    }

    pub fn import_logs(&self) -> &[ImportReport] {
        &self.import_logs
    }

    pub fn stats_mode(&self) -> StatisticsMode {
        self.stats_mode
    }

    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub(crate) fn find_user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn find_client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub(crate) fn find_client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    /// First assignment matching `predicate`
    pub fn find_assignment<P>(&self, mut predicate: P) -> Option<&Assignment>
    where
        P: FnMut(&Assignment) -> bool,
    {
        self.assignments.iter().find(|a| predicate(a))
    }

    pub fn assignment(&self, id: AssignmentId) -> Option<&Assignment> {
        self.find_assignment(|a| a.id == id)
    }

    pub(crate) fn assignment_mut(&mut self, id: AssignmentId) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == id)
    }

    /// The agent's assignment that is not yet completed, if any
    pub fn open_assignment_for(&self, agent_id: UserId) -> Option<&Assignment> {
        self.find_assignment(|a| a.agent_id == agent_id && a.is_open())
    }

    /// Every assignment ever given to the agent, in creation order
    pub fn assignments_for(&self, agent_id: UserId) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.agent_id == agent_id)
            .collect()
    }

    pub fn list_agents(&self) -> Vec<&User> {
        self.users.iter().filter(|u| u.role == Role::Agent).collect()
    }

    pub fn list_pending_clients(&self) -> Vec<&Client> {
        self.clients
            .iter()
            .filter(|c| c.status == ClientStatus::Pending)
            .collect()
    }

    pub fn next_client_id(&self) -> ClientId {
        self.clients.len() as ClientId + 1
    }

    pub fn next_assignment_id(&self) -> AssignmentId {
        self.assignments.len() as AssignmentId + 1
    }

    /// Append a client, overwriting its id with the next free one
    pub fn append_client(&mut self, mut client: Client) -> ClientId {
        client.id = self.next_client_id();
        let id = client.id;
        self.clients.push(client);
        id
    }

    /// Append an assignment, overwriting its id with the next free one
    pub fn append_assignment(&mut self, mut assignment: Assignment) -> AssignmentId {
        assignment.id = self.next_assignment_id();
        let id = assignment.id;
        self.assignments.push(assignment);
        id
    }

    pub(crate) fn append_location_log(&mut self, log: LocationLog) {
        self.location_logs.push(log);
    }

    pub(crate) fn append_import_log(&mut self, report: ImportReport) {
        self.import_logs.push(report);
    }

    /// Counters as the dashboard should show them
    pub fn statistics(&self) -> Statistics {
        match self.stats_mode {
            StatisticsMode::Incremental => self.statistics,
            StatisticsMode::Recompute => self.recomputed_statistics(),
        }
    }

    pub fn recomputed_statistics(&self) -> Statistics {
        Statistics::recompute(&self.users, &self.clients, &self.assignments)
    }

    /// How far the cached counters have wandered from the collections
    pub fn drift(&self) -> StatisticsDrift {
        StatisticsDrift::between(&self.statistics, &self.recomputed_statistics())
    }

    pub(crate) fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}
