//! Errors raised by the assignment engine and the session on top of it

use serde::Serialize;

use crate::store::{AssignmentId, AssignmentStatus, ClientId, ClientStatus, Role, UserId};

/// How loudly a failure should be surfaced to the person at the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Agent not found: {0}")]
    AgentNotFound(UserId),

    #[error("User {0} is not an agent")]
    NotAnAgent(UserId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    #[error("Client {client_id} is {status}, only pending clients can be assigned")]
    ClientNotPending {
        client_id: ClientId,
        status: ClientStatus,
    },

    #[error("Agent {agent_id} is already working on assignment {assignment_id}")]
    AgentBusy {
        agent_id: UserId,
        assignment_id: AssignmentId,
    },

    #[error("Assignment {assignment_id} cannot move from {from} to {to}")]
    InvalidTransition {
        assignment_id: AssignmentId,
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    #[error("No pending clients to assign")]
    NoPendingClients,

    #[error("No available agents for assignment")]
    NoAvailableAgents,

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid credentials for {0}")]
    InvalidCredentials(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Only a {required} can do this, logged in as {actual}")]
    WrongRole { required: Role, actual: Role },

    #[error("No current assignment")]
    NoCurrentAssignment,

    #[error("Invalid location: {latitude}, {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },
}

impl EngineError {
    /// Nothing to act on or an out-of-order request is a warning; bad input is an error
    pub fn severity(&self) -> Severity {
        match self {
            EngineError::NoPendingClients
            | EngineError::NoAvailableAgents
            | EngineError::NoCurrentAssignment
            | EngineError::InvalidTransition { .. }
            | EngineError::AgentBusy { .. }
            | EngineError::ClientNotPending { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
