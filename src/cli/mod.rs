//! CLI module

pub mod commands;
pub mod demo;
pub mod repl;

pub fn run() -> anyhow::Result<()> {
    commands::run()
}
