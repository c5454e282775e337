//! Dashboard session: login, user actions and notifications

pub mod controller;
pub mod notify;

pub use controller::Session;
pub use notify::{Notification, NotificationCenter};
