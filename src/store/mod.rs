//! Entity store: the single source of truth for users, clients and assignments

pub mod models;
pub mod seed;
pub mod stats;
pub mod store;

pub use models::{
    Assignment, AssignmentId, AssignmentStatus, Client, ClientId, ClientRecord, ClientStatus,
    ImportReport, Location, LocationLog, Priority, Role, User, UserId,
};
pub use stats::{Statistics, StatisticsDrift, StatisticsMode};
pub use store::EntityStore;
