use railbook_core::Ticket;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user: credentials plus the tickets they currently hold.
/// Only the password hash is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub hashed_password: String,
    pub tickets_booked: Vec<Ticket>,
}

impl User {
    pub fn new(name: impl Into<String>, hashed_password: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: name.into(),
            hashed_password,
            tickets_booked: Vec::new(),
        }
    }

    /// User names are unique case-insensitively.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}
