//! Fieldops - dispatch field agents to client visits and track them to completion

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod session;
pub mod sim;
pub mod store;
pub mod view;
