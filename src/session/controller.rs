//! Session controller
//!
//! Owns the store for one running dashboard, forwards user actions to the
//! assignment engine, turns every outcome into a notification and hands a
//! fresh dashboard to the projector after each successful change.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::core::Clock;
use crate::engine::{AssignmentEngine, EngineError, Result, Severity};
use crate::store::{
    seed, AssignmentId, ClientId, ClientRecord, EntityStore, ImportReport, Location, Role, User,
    UserId,
};
use crate::view::{self, DashboardView, Projector};

use super::notify::{Notification, NotificationCenter};

pub struct Session<P: Projector> {
    store: EntityStore,
    engine: AssignmentEngine,
    clock: Arc<dyn Clock>,
    projector: P,
    notifications: NotificationCenter,
    current_user: Option<UserId>,
}

impl<P: Projector> Session<P> {
    pub fn new(
        store: EntityStore,
        engine: AssignmentEngine,
        clock: Arc<dyn Clock>,
        projector: P,
        notification_ttl: std::time::Duration,
    ) -> Self {
        Self {
            store,
            engine,
            clock,
            projector,
            notifications: NotificationCenter::new(notification_ttl),
            current_user: None,
        }
    }

    /// Session over the demo data (or an empty store) as configured
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>, projector: P) -> Self {
        let mode = config.statistics.mode;
        let store = if config.seed_demo_data {
            seed::demo_store(clock.now(), mode)
        } else {
            EntityStore::new(mode)
        };
        let engine = AssignmentEngine::new(clock.clone(), config.assignment.strategy);

        Self::new(
            store,
            engine,
            clock,
            projector,
            config.simulation.notification_ttl(),
        )
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AssignmentEngine {
        &mut self.engine
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Notifications not handed out yet; expired ones are dropped
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let now = self.clock.now();
        self.notifications.take_new(now)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.store.find_user(id))
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Dashboard for whoever is logged in
    pub fn view(&self) -> Option<DashboardView> {
        view::project(&self.store, self.current_user(), self.clock.now())
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let now = self.clock.now();
        self.notifications.push(message, severity, now);
    }

    /// Look the user up by name. The password must be present but is not checked.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Role> {
        let result = self.try_login(username.trim(), password);
        self.finish(result)
    }

    fn try_login(&mut self, username: &str, password: &str) -> Result<(Role, String)> {
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::MissingInput("username and password"));
        }

        let user = self
            .store
            .find_user_by_username(username)
            .ok_or_else(|| EngineError::InvalidCredentials(username.to_string()))?;
        let (id, role) = (user.id, user.role);

        self.current_user = Some(id);
        debug!("User {} logged in as {}", id, role);
        Ok((role, format!("Logged in successfully as {}", role)))
    }

    pub fn logout(&mut self) {
        if self.current_user.take().is_some() {
            self.notify("Logged out successfully", Severity::Info);
            self.projector.clear();
        }
    }

    pub fn auto_assign(&mut self) -> Result<AssignmentId> {
        let result = self.try_auto_assign();
        self.finish(result)
    }

    fn try_auto_assign(&mut self) -> Result<(AssignmentId, String)> {
        self.require_role(Role::Manager)?;
        self.notify("Auto-assigning clients to available agents...", Severity::Info);

        let id = self.engine.auto_assign(&mut self.store)?;
        let message = self.describe_assignment("Assigned", id);
        Ok((id, message))
    }

    /// Assign as many pending clients as there are available agents
    pub fn auto_assign_all(&mut self) -> Result<Vec<AssignmentId>> {
        let result = self.try_auto_assign_all();
        self.finish(result)
    }

    fn try_auto_assign_all(&mut self) -> Result<(Vec<AssignmentId>, String)> {
        self.require_role(Role::Manager)?;
        self.notify("Auto-assigning clients to available agents...", Severity::Info);

        let ids = self.engine.auto_assign_all(&mut self.store)?;
        let message = format!("{} assignments created successfully", ids.len());
        Ok((ids, message))
    }

    pub fn manual_assign(&mut self, agent_id: UserId, client_id: ClientId) -> Result<AssignmentId> {
        let result = self.try_manual_assign(agent_id, client_id);
        self.finish(result)
    }

    fn try_manual_assign(
        &mut self,
        agent_id: UserId,
        client_id: ClientId,
    ) -> Result<(AssignmentId, String)> {
        self.require_role(Role::Manager)?;

        let id = self
            .engine
            .create_assignment(&mut self.store, agent_id, client_id)?;
        let message = self.describe_assignment("Manually assigned", id);
        Ok((id, message))
    }

    /// Add parsed client rows from an uploaded file
    pub fn upload_clients(
        &mut self,
        file_name: &str,
        records: &[ClientRecord],
    ) -> Result<ImportReport> {
        let result = self.try_upload_clients(file_name, records);
        self.finish(result)
    }

    fn try_upload_clients(
        &mut self,
        file_name: &str,
        records: &[ClientRecord],
    ) -> Result<(ImportReport, String)> {
        let manager_id = self.require_role(Role::Manager)?;
        if records.is_empty() {
            return Err(EngineError::MissingInput("client file"));
        }
        self.notify("Uploading client data...", Severity::Info);

        let report =
            self.engine
                .bulk_upload_clients(&mut self.store, file_name, records, Some(manager_id))?;

        if report.failed > 0 {
            self.notify(
                format!("{} rows failed to import", report.failed),
                Severity::Warning,
            );
        }
        let message = format!(
            "Successfully uploaded {} new clients",
            report.imported.len()
        );
        Ok((report, message))
    }

    pub fn accept_current(&mut self) -> Result<AssignmentId> {
        let result = self.try_advance_current(Step::Accept);
        self.finish(result)
    }

    pub fn start_current(&mut self) -> Result<AssignmentId> {
        let result = self.try_advance_current(Step::Start);
        self.finish(result)
    }

    pub fn complete_current(&mut self, notes: Option<String>) -> Result<AssignmentId> {
        let result = self.try_advance_current(Step::Complete(notes));
        self.finish(result)
    }

    /// The logged-in agent's open assignment
    pub fn current_assignment_id(&self) -> Option<AssignmentId> {
        let user = self.current_user()?;
        self.store.open_assignment_for(user.id).map(|a| a.id)
    }

    fn try_advance_current(&mut self, step: Step) -> Result<(AssignmentId, String)> {
        self.require_role(Role::Agent)?;
        let id = self
            .current_assignment_id()
            .ok_or(EngineError::NoCurrentAssignment)?;

        let message = match step {
            Step::Accept => {
                self.engine.accept(&mut self.store, id)?;
                "Assignment accepted successfully"
            }
            Step::Start => {
                self.engine.start(&mut self.store, id)?;
                "Assignment started"
            }
            Step::Complete(notes) => {
                self.engine.complete(&mut self.store, id, notes)?;
                "Assignment completed successfully!"
            }
        };
        Ok((id, message.to_string()))
    }

    /// Record the logged-in agent's position
    pub fn share_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
    ) -> Result<()> {
        let result = self.try_share_location(Location::new(latitude, longitude), accuracy);
        self.finish(result)
    }

    fn try_share_location(
        &mut self,
        location: Location,
        accuracy: Option<f64>,
    ) -> Result<((), String)> {
        let agent_id = self.require_role(Role::Agent)?;
        self.notify("Location shared with manager", Severity::Info);

        self.engine
            .share_location(&mut self.store, agent_id, location, accuracy)?;
        Ok(((), "Location updated successfully".to_string()))
    }

    /// Re-render without changing anything
    pub fn refresh(&mut self) -> Result<()> {
        if !self.is_logged_in() {
            return self.finish(Err(EngineError::NotLoggedIn));
        }
        self.notify("Refreshing data...", Severity::Info);

        let drift = self.store.drift();
        if !drift.is_zero() {
            warn!("Statistics drifted from the collections: {:?}", drift);
        }
        self.finish(Ok(((), "Data refreshed successfully".to_string())))
    }

    fn require_role(&self, required: Role) -> Result<UserId> {
        let user = self.current_user().ok_or(EngineError::NotLoggedIn)?;
        if user.role != required {
            return Err(EngineError::WrongRole {
                required,
                actual: user.role,
            });
        }
        Ok(user.id)
    }

    fn describe_assignment(&self, verb: &str, id: AssignmentId) -> String {
        let names = self.store.assignment(id).map(|a| {
            let client = self
                .store
                .find_client(a.client_id)
                .map(|c| c.name.as_str())
                .unwrap_or("client");
            let agent = self
                .store
                .find_user(a.agent_id)
                .map(|u| u.username.as_str())
                .unwrap_or("agent");
            (client, agent)
        });
        match names {
            Some((client, agent)) => format!("{} {} to {}", verb, client, agent),
            None => format!("{} assignment {}", verb, id),
        }
    }

    /// Report the outcome, then re-render on success
    fn finish<T>(&mut self, result: Result<(T, String)>) -> Result<T> {
        match result {
            Ok((value, message)) => {
                self.notify(message, Severity::Success);
                self.render();
                Ok(value)
            }
            Err(e) => {
                self.notify(e.to_string(), e.severity());
                Err(e)
            }
        }
    }

    fn render(&mut self) {
        if let Some(view) = self.view() {
            self.projector.render(&view);
        }
    }
}

enum Step {
    Accept,
    Start,
    Complete(Option<String>),
}
