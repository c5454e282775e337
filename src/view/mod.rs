//! Pure projection of the store into dashboard view models

pub mod dashboard;
pub mod projector;

pub use dashboard::{
    project, AgentCard, AgentView, AssignmentRow, CurrentAssignment, DashboardView, HistoryRow,
    ManagerView, MapMarker, MarkerKind,
};
pub use projector::{render_text, ConsoleProjector, Projector, RecordingProjector};
