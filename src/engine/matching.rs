//! Picking which client goes to which agent on auto-assign

use std::cmp::Ordering;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::{Client, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// First pending client in store order, first available agent.
    /// Client priority is stored but not honored.
    #[default]
    FirstPending,
    /// Most urgent pending client (lowest priority number), first available agent
    Priority,
    /// Most urgent pending client, closest available agent
    Nearest,
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStrategy::FirstPending => "first_pending",
            AssignmentStrategy::Priority => "priority",
            AssignmentStrategy::Nearest => "nearest",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "first_pending" => Ok(AssignmentStrategy::FirstPending),
            "priority" => Ok(AssignmentStrategy::Priority),
            "nearest" => Ok(AssignmentStrategy::Nearest),
            _ => anyhow::bail!("Unknown assignment strategy: {}", s),
        }
    }

    /// Choose a (client, agent) pair, `None` when either list is empty
    pub fn select<'a>(
        &self,
        pending: &[&'a Client],
        available: &[&'a User],
    ) -> Option<(&'a Client, &'a User)> {
        match self {
            AssignmentStrategy::FirstPending => {
                Some((*pending.first()?, *available.first()?))
            }
            AssignmentStrategy::Priority => {
                let client = most_urgent(pending)?;
                Some((client, *available.first()?))
            }
            AssignmentStrategy::Nearest => {
                let client = most_urgent(pending)?;
                let agent = available.iter().copied().min_by(|a, b| {
                    distance_to(client, a)
                        .partial_cmp(&distance_to(client, b))
                        .unwrap_or(Ordering::Equal)
                })?;
                Some((client, agent))
            }
        }
    }
}

// min_by_key keeps the first of equal keys, so ties go by store order
fn most_urgent<'a>(pending: &[&'a Client]) -> Option<&'a Client> {
    pending.iter().copied().min_by_key(|c| c.priority)
}

fn distance_to(client: &Client, agent: &User) -> f64 {
    agent
        .location
        .map(|loc| loc.distance_km(&client.location))
        .unwrap_or(f64::INFINITY)
}
