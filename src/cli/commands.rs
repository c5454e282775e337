//! CLI commands

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::SystemClock;
use crate::engine::AssignmentStrategy;
use crate::session::Session;
use crate::view::{ConsoleProjector, Projector};

use super::demo;
use super::repl::{self, ReplCommand};

#[derive(Parser)]
#[command(name = "fieldops")]
#[command(about = "Field operations dispatch: assign agents to client visits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config path (default: ~/.fieldops/config.yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Auto-assign strategy, overrides the config file (first_pending, priority, nearest)
    #[arg(long, global = true)]
    strategy: Option<String>,

    /// Print dashboards as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the manager dashboard over the demo data
    Show,

    /// Show one user's dashboard
    Login {
        /// Username (manager1, agent1, agent2 in the demo data)
        username: String,
    },

    /// Interactive shell
    Repl,

    /// Scripted walkthrough with simulated delays and timers
    Demo {
        /// Skip the simulated delays
        #[arg(long)]
        fast: bool,
    },

    /// Write a default config file
    InitConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(strategy) = &cli.strategy {
        config.assignment.strategy = AssignmentStrategy::from_str(strategy)?;
    }

    let projector = ConsoleProjector { json: cli.json };

    match cli.command {
        Commands::Show => {
            let mut session = Session::from_config(&config, Arc::new(SystemClock), projector);
            show_as(&mut session, "manager1")
        }

        Commands::Login { username } => {
            let mut session = Session::from_config(&config, Arc::new(SystemClock), projector);
            show_as(&mut session, &username)
        }

        Commands::Repl => {
            let mut session = Session::from_config(&config, Arc::new(SystemClock), projector);
            run_repl(&mut session)
        }

        Commands::Demo { fast } => {
            if fast {
                let sim = &mut config.simulation;
                sim.auto_assign_delay_ms = 0;
                sim.upload_delay_ms = 0;
                sim.refresh_delay_ms = 0;
            }

            // Create a multi-threaded runtime for the simulated timers
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            rt.block_on(demo::run(&config, cli.json))
        }

        Commands::InitConfig => {
            Config::default().save(cli.config.as_deref())?;
            println!(
                "Wrote default config to {:?}",
                Config::config_path(cli.config.as_deref())?
            );
            Ok(())
        }
    }
}

fn show_as<P: Projector>(session: &mut Session<P>, username: &str) -> Result<()> {
    // Logging in renders the dashboard
    if let Err(e) = session.login(username, "password") {
        anyhow::bail!("{}", e);
    }
    Ok(())
}

fn run_repl<P: Projector>(session: &mut Session<P>) -> Result<()> {
    println!("{}", repl::HELP);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let keep_going = match ReplCommand::parse(&line) {
            Ok(Some(command)) => match repl::execute(session, command) {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    println!("error: {:#}", e);
                    true
                }
            },
            Ok(None) => true,
            Err(e) => {
                println!("error: {:#}", e);
                true
            }
        };

        for n in session.take_notifications() {
            println!("[{}] {}", n.severity.as_str(), n.message);
        }

        if !keep_going {
            break;
        }
    }

    Ok(())
}
