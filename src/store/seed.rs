//! Demo data loaded at startup

use chrono::{DateTime, TimeZone, Utc};

use super::models::{
    Assignment, AssignmentStatus, Client, ClientStatus, Location, Priority, User,
};
use super::stats::StatisticsMode;
use super::store::EntityStore;

fn morning_of_demo_day(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 29, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo_users() -> Vec<User> {
    vec![
        User::manager(1, "manager1", Some("manager@company.com".to_string())),
        User::agent(2, "agent1", "9876543210", Some(Location::new(12.9716, 77.5946))),
        User::agent(3, "agent2", "9876543211", Some(Location::new(12.9758, 77.6070))),
    ]
}

pub fn demo_clients(created_at: DateTime<Utc>) -> Vec<Client> {
    let client = |id, name: &str, phone: &str, address: &str, lat, lng, priority, status| Client {
        id,
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        address: address.to_string(),
        location: Location::new(lat, lng),
        priority,
        status,
        created_at,
    };

    vec![
        client(
            1,
            "John Doe",
            "9876543210",
            "123 Main St, Bangalore",
            12.9716,
            77.5946,
            Priority::LOW,
            ClientStatus::Pending,
        ),
        client(
            2,
            "Jane Smith",
            "9876543211",
            "456 MG Road, Bangalore",
            12.9758,
            77.6070,
            Priority::MEDIUM,
            ClientStatus::Assigned,
        ),
        client(
            3,
            "Bob Wilson",
            "9876543212",
            "789 Brigade Road, Bangalore",
            12.9698,
            77.6205,
            Priority::HIGH,
            ClientStatus::Completed,
        ),
        client(
            4,
            "Alice Johnson",
            "9876543213",
            "321 Commercial St, Bangalore",
            12.9833,
            77.5833,
            Priority::MEDIUM,
            ClientStatus::Pending,
        ),
        client(
            5,
            "Charlie Brown",
            "9876543214",
            "654 Residency Road, Bangalore",
            12.9667,
            77.6000,
            Priority::HIGH,
            ClientStatus::Pending,
        ),
    ]
}

pub fn demo_assignments() -> Vec<Assignment> {
    vec![
        Assignment {
            id: 1,
            agent_id: 2,
            client_id: 2,
            status: AssignmentStatus::InProgress,
            assigned_at: morning_of_demo_day(10, 30),
            accepted_at: Some(morning_of_demo_day(10, 35)),
            started_at: Some(morning_of_demo_day(10, 50)),
            completed_at: None,
            notes: None,
        },
        Assignment {
            id: 2,
            agent_id: 3,
            client_id: 3,
            status: AssignmentStatus::Completed,
            assigned_at: morning_of_demo_day(9, 0),
            accepted_at: Some(morning_of_demo_day(9, 5)),
            started_at: Some(morning_of_demo_day(9, 40)),
            completed_at: Some(morning_of_demo_day(11, 30)),
            notes: None,
        },
    ]
}

/// Store with the demo users, clients and assignments; counters derived from them
pub fn demo_store(now: DateTime<Utc>, stats_mode: StatisticsMode) -> EntityStore {
    EntityStore::with_records(
        demo_users(),
        demo_clients(now),
        demo_assignments(),
        stats_mode,
    )
}
