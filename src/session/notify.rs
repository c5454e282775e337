//! User-facing notifications

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::Severity;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Fire-and-forget message feed
///
/// A message counts as shown until its time to live runs out. The shell pulls
/// messages it has not displayed yet with [`NotificationCenter::take_new`],
/// which also drops delivered messages that have expired.
#[derive(Debug)]
pub struct NotificationCenter {
    log: Vec<Notification>,
    ttl: Duration,
    delivered: usize,
}

impl NotificationCenter {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            log: Vec::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(5)),
            delivered: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) {
        let message = message.into();
        match severity {
            Severity::Warning | Severity::Error => warn!("[{}] {}", severity.as_str(), message),
            Severity::Info | Severity::Success => info!("[{}] {}", severity.as_str(), message),
        }
        self.log.push(Notification {
            message,
            severity,
            created_at: now,
        });
    }

    /// Messages still on screen at `now`
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.log
            .iter()
            .filter(|n| now - n.created_at < self.ttl)
            .collect()
    }

    /// Messages pushed since the last call
    pub fn take_new(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        let fresh = self.log[self.delivered..].to_vec();
        // Everything is delivered from here on, so only expiry keeps an entry
        let ttl = self.ttl;
        self.log.retain(|n| now - n.created_at < ttl);
        self.delivered = self.log.len();
        fresh
    }

    pub fn all(&self) -> &[Notification] {
        &self.log
    }

    pub fn last(&self) -> Option<&Notification> {
        self.log.last()
    }
}
