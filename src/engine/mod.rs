//! Assignment engine: creation, matching and the assignment lifecycle

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod matching;

pub use engine::AssignmentEngine;
pub use error::{EngineError, Result, Severity};
pub use matching::AssignmentStrategy;
