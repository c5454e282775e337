//! Records held by the entity store

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type ClientId = u32;
pub type AssignmentId = u32;

/// Mean earth radius used for haversine distances
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Agent => "agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside the usual latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &Location) -> f64 {
        let (lat1, lon1) = (self.latitude.to_radians(), self.longitude.to_radians());
        let (lat2, lon2) = (other.latitude.to_radians(), other.longitude.to_radians());

        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        c * EARTH_RADIUS_KM
    }
}

/// Someone taking part in field operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub email: Option<String>,
    /// Agents only
    pub phone: Option<String>,
    /// Agents only, moved by location sharing
    pub location: Option<Location>,
    pub last_location_update: Option<DateTime<Utc>>,
    /// Counted in `active_agents`
    pub active: bool,
}

impl User {
    pub fn manager(id: UserId, username: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id,
            username: username.into(),
            role: Role::Manager,
            email,
            phone: None,
            location: None,
            last_location_update: None,
            active: false,
        }
    }

    pub fn agent(
        id: UserId,
        username: impl Into<String>,
        phone: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            role: Role::Agent,
            email: None,
            phone: Some(phone.into()),
            location,
            last_location_update: None,
            active: true,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}

/// Visit priority. Lower number means more urgent: 1 high, 2 medium, 3 low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const HIGH: Priority = Priority(1);
    pub const MEDIUM: Priority = Priority(2);
    pub const LOW: Priority = Priority(3);

    /// Accepts 1..=3, anything else (or nothing) falls back to medium
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(1) => Priority::HIGH,
            Some(2) => Priority::MEDIUM,
            Some(3) => Priority::LOW,
            _ => Priority::MEDIUM,
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "High",
            2 => "Medium",
            _ => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::MEDIUM
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Pending,
    Assigned,
    Completed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Pending => "pending",
            ClientStatus::Assigned => "assigned",
            ClientStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A site or customer that needs a visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub location: Location,
    pub priority: Priority,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Accepted,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
        }
    }

    /// Anything short of completed keeps the agent busy
    pub fn is_open(&self) -> bool {
        !matches!(self, AssignmentStatus::Completed)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One agent bound to one client visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub agent_id: UserId,
    pub client_id: ClientId,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Assignment {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

/// Position reported by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationLog {
    pub agent_id: UserId,
    pub location: Location,
    /// GPS accuracy in metres
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// A client row as parsed from an uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Outcome of one bulk upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub file_name: String,
    pub total_rows: usize,
    pub imported: Vec<ClientId>,
    pub failed: usize,
    pub errors: Vec<String>,
    pub uploaded_by: Option<UserId>,
    pub uploaded_at: DateTime<Utc>,
}
