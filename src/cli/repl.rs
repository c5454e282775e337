//! Line commands understood by the interactive shell

use std::path::Path;

use anyhow::{Context, Result};

use crate::engine::{AssignmentStrategy, Severity};
use crate::session::Session;
use crate::store::ClientRecord;
use crate::view::Projector;

pub const HELP: &str = "\
Commands:
  login <username> <password>   log in (password is required but not checked)
  logout
  show                          print the current dashboard
  stats                         print statistics and drift
  auto-assign                   assign the next pending client
  auto-assign-all               assign until clients or agents run out
  strategy [name]               show or set the auto-assign strategy
                                (first_pending, priority, nearest)
  assign <agent_id> <client_id> manual assignment
  upload <file.json>            add clients from a JSON array of records
  accept | start | complete [notes]
  share <lat> <lng> [accuracy]  share the agent's location
  refresh
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Login { username: String, password: String },
    Logout,
    Show,
    Stats,
    AutoAssign,
    AutoAssignAll,
    Strategy { strategy: Option<AssignmentStrategy> },
    Assign { agent_id: u32, client_id: u32 },
    Upload { path: String },
    Accept,
    Start,
    Complete { notes: Option<String> },
    Share { latitude: f64, longitude: f64, accuracy: Option<f64> },
    Refresh,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb {
            "login" => ReplCommand::Login {
                username: words.next().unwrap_or_default().to_string(),
                password: words.next().unwrap_or_default().to_string(),
            },
            "logout" => ReplCommand::Logout,
            "show" => ReplCommand::Show,
            "stats" => ReplCommand::Stats,
            "auto-assign" => ReplCommand::AutoAssign,
            "auto-assign-all" => ReplCommand::AutoAssignAll,
            "strategy" => ReplCommand::Strategy {
                strategy: words.next().map(AssignmentStrategy::from_str).transpose()?,
            },
            "assign" => ReplCommand::Assign {
                agent_id: parse_arg(words.next(), "agent_id")?,
                client_id: parse_arg(words.next(), "client_id")?,
            },
            "upload" => ReplCommand::Upload {
                path: words
                    .next()
                    .context("upload needs a file path")?
                    .to_string(),
            },
            "accept" => ReplCommand::Accept,
            "start" => ReplCommand::Start,
            "complete" => {
                let notes = words.collect::<Vec<_>>().join(" ");
                ReplCommand::Complete {
                    notes: (!notes.is_empty()).then_some(notes),
                }
            }
            "share" => ReplCommand::Share {
                latitude: parse_arg(words.next(), "lat")?,
                longitude: parse_arg(words.next(), "lng")?,
                accuracy: words.next().map(|w| w.parse()).transpose()?,
            },
            "refresh" => ReplCommand::Refresh,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => anyhow::bail!("Unknown command: {} (try `help`)", other),
        };

        Ok(Some(command))
    }
}

fn parse_arg<T>(word: Option<&str>, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = word.with_context(|| format!("missing <{}>", name))?;
    word.parse()
        .with_context(|| format!("invalid <{}>: {}", name, word))
}

/// Read client records from a JSON file
pub fn load_client_records(path: &Path) -> Result<Vec<ClientRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read client file {:?}", path))?;
    let records: Vec<ClientRecord> =
        serde_json::from_str(&raw).context("Failed to parse client file")?;
    Ok(records)
}

/// Run one command. Returns `false` when the shell should exit.
///
/// Engine failures are already reported as notifications by the session,
/// so they are not propagated here.
pub fn execute<P: Projector>(session: &mut Session<P>, command: ReplCommand) -> Result<bool> {
    match command {
        ReplCommand::Login { username, password } => {
            let _ = session.login(&username, &password);
        }
        ReplCommand::Logout => session.logout(),
        ReplCommand::Show => match session.view() {
            Some(view) => println!("{}", crate::view::render_text(&view)),
            None => println!("Not logged in"),
        },
        ReplCommand::Stats => {
            let store = session.store();
            println!("{:?}", store.statistics());
            let drift = store.drift();
            if !drift.is_zero() {
                println!("drift: {:?}", drift);
            }
        }
        ReplCommand::AutoAssign => {
            let _ = session.auto_assign();
        }
        ReplCommand::AutoAssignAll => {
            let _ = session.auto_assign_all();
        }
        ReplCommand::Strategy { strategy } => match strategy {
            Some(strategy) => {
                session.engine_mut().set_strategy(strategy);
                session.notify(
                    format!("Auto-assign strategy set to {}", strategy.as_str()),
                    Severity::Info,
                );
            }
            None => println!(
                "Auto-assign strategy: {}",
                session.engine().strategy().as_str()
            ),
        },
        ReplCommand::Assign {
            agent_id,
            client_id,
        } => {
            let _ = session.manual_assign(agent_id, client_id);
        }
        ReplCommand::Upload { path } => {
            let path = Path::new(&path);
            let records = load_client_records(path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Ok(report) = session.upload_clients(&file_name, &records) {
                for error in &report.errors {
                    println!("  {}", error);
                }
            }
        }
        ReplCommand::Accept => {
            let _ = session.accept_current();
        }
        ReplCommand::Start => {
            let _ = session.start_current();
        }
        ReplCommand::Complete { notes } => {
            let _ = session.complete_current(notes);
        }
        ReplCommand::Share {
            latitude,
            longitude,
            accuracy,
        } => {
            let _ = session.share_location(latitude, longitude, accuracy);
        }
        ReplCommand::Refresh => {
            let _ = session.refresh();
        }
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::Quit => return Ok(false),
    }

    Ok(true)
}
