use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Record of a completed booking, owned by the booking user.
///
/// Immutable after creation: cancellation removes the ticket from its
/// owner's list instead of mutating it. The claimed seat cell is carried
/// as `(train_id, row, seat)` so cancellation can release exactly the
/// cell this ticket occupies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub train_id: String,
    pub row: usize,
    pub seat: usize,
    pub source: String,
    pub destination: String,
    pub date_of_travel: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Build a ticket for a freshly reserved seat. No validation happens
    /// here; the reservation engine has already checked the seat and route.
    pub fn create(
        user_id: Uuid,
        train_id: &str,
        row: usize,
        seat: usize,
        source: &str,
        destination: &str,
        date_of_travel: NaiveDate,
    ) -> Self {
        Self {
            ticket_id: Uuid::new_v4(),
            user_id,
            train_id: train_id.to_string(),
            row,
            seat,
            source: source.trim().to_lowercase(),
            destination: destination.trim().to_lowercase(),
            date_of_travel,
            created_at: Utc::now(),
        }
    }

    /// True when `candidate` names this ticket's identifier exactly.
    pub fn matches_id(&self, candidate: &str) -> bool {
        self.ticket_id.to_string() == candidate
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket {} | {} -> {} | {} | Train {} | Row {} Seat {}",
            self.ticket_id,
            self.source,
            self.destination,
            self.date_of_travel,
            self.train_id,
            self.row,
            self.seat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_fresh_identifier() {
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2027, 1, 15).unwrap();

        let a = Ticket::create(user_id, "12951", 0, 0, "delhi", "jaipur", date);
        let b = Ticket::create(user_id, "12951", 0, 1, "delhi", "jaipur", date);

        assert_ne!(a.ticket_id, b.ticket_id);
        assert_eq!(a.user_id, user_id);
        assert_eq!(a.train_id, "12951");
    }

    #[test]
    fn test_create_normalizes_stations() {
        let date = NaiveDate::from_ymd_opt(2027, 1, 15).unwrap();
        let ticket = Ticket::create(Uuid::new_v4(), "12951", 1, 2, "  Delhi ", "JAIPUR", date);

        assert_eq!(ticket.source, "delhi");
        assert_eq!(ticket.destination, "jaipur");
    }

    #[test]
    fn test_matches_id_is_exact() {
        let date = NaiveDate::from_ymd_opt(2027, 1, 15).unwrap();
        let ticket = Ticket::create(Uuid::new_v4(), "12951", 0, 0, "delhi", "jaipur", date);

        assert!(ticket.matches_id(&ticket.ticket_id.to_string()));
        assert!(!ticket.matches_id(""));
        assert!(!ticket.matches_id("not-a-ticket"));
    }
}
