use chrono::{NaiveDate, Utc};
use railbook_catalog::{Train, TrainCatalog};
use railbook_core::{Session, Ticket};
use railbook_directory::{DirectoryError, UserDirectory};
use railbook_store::StoreError;
use std::collections::HashSet;

/// Orchestrates booking and cancellation across the train catalog and the
/// user directory.
///
/// The two persistence writes of a booking (train file, then user file)
/// are sequential and not atomic; a crash in between leaves a seat flagged
/// occupied with no ticket claiming it. `reconcile` repairs that window at
/// startup, treating tickets as the source of truth for occupancy.
pub struct ReservationEngine {
    catalog: TrainCatalog,
    directory: UserDirectory,
}

impl ReservationEngine {
    pub fn new(catalog: TrainCatalog, directory: UserDirectory) -> Self {
        Self { catalog, directory }
    }

    pub fn sign_up(&mut self, name: &str, password: &str) -> Result<Session, DirectoryError> {
        let user = self.directory.sign_up(name, password)?;
        Ok(Session::new(user.user_id, user.name))
    }

    /// `Ok(None)` means bad credentials; faults are I/O only.
    pub fn login(&self, name: &str, password: &str) -> Result<Option<Session>, DirectoryError> {
        Ok(self
            .directory
            .authenticate(name, password)?
            .map(|user| Session::new(user.user_id, user.name)))
    }

    pub fn search_trains(&self, source: &str, destination: &str) -> Vec<&Train> {
        self.catalog.search(source, destination)
    }

    pub fn train_by_id(&self, train_id: &str) -> Option<&Train> {
        self.catalog.find_by_id(train_id)
    }

    pub fn fetch_bookings(&self, session: &Session) -> Result<Vec<Ticket>, BookingError> {
        let user = self
            .directory
            .find_by_id(session.user_id)
            .ok_or(BookingError::NotAuthenticated)?;
        Ok(user.tickets_booked.clone())
    }

    /// Reserve one seat cell for the session user.
    ///
    /// Validates the seat against the train's matrix, the stations against
    /// the route, and the travel date; on success flips the cell, persists
    /// the train, then attaches a fresh ticket to the user and persists the
    /// directory. A failed validation mutates nothing.
    pub fn book_seat(
        &mut self,
        session: &Session,
        train_id: &str,
        row: usize,
        seat: usize,
        source: &str,
        destination: &str,
        date_of_travel: NaiveDate,
    ) -> Result<Ticket, BookingError> {
        let user_id = self
            .directory
            .find_by_id(session.user_id)
            .ok_or(BookingError::NotAuthenticated)?
            .user_id;

        let mut train = self
            .catalog
            .find_by_id(train_id)
            .cloned()
            .ok_or_else(|| BookingError::TrainNotFound(train_id.to_string()))?;

        if !train.serves_route(source, destination) {
            return Err(BookingError::InvalidRoute {
                train_id: train.train_id.clone(),
                origin: source.trim().to_lowercase(),
                destination: destination.trim().to_lowercase(),
            });
        }

        if date_of_travel < Utc::now().date_naive() {
            return Err(BookingError::DateInPast(date_of_travel));
        }

        train
            .seats
            .occupy(row, seat)
            .map_err(|_| BookingError::SeatUnavailable { row, seat })?;

        let canonical_id = train.train_id.clone();
        self.catalog.upsert(train)?;

        let ticket = Ticket::create(
            user_id,
            &canonical_id,
            row,
            seat,
            source,
            destination,
            date_of_travel,
        );
        self.directory.add_ticket(user_id, ticket.clone())?;

        tracing::info!(
            ticket = %ticket.ticket_id,
            train = %canonical_id,
            row,
            seat,
            "seat booked"
        );
        Ok(ticket)
    }

    /// Cancel one of the session user's tickets by identifier.
    ///
    /// Releases the seat cell the ticket claims and persists the train,
    /// then removes the ticket and persists the directory. `Ok(false)` for
    /// a blank or unknown identifier, with no mutation.
    pub fn cancel(&mut self, session: &Session, ticket_id: &str) -> Result<bool, BookingError> {
        let user = self
            .directory
            .find_by_id(session.user_id)
            .ok_or(BookingError::NotAuthenticated)?;
        let user_id = user.user_id;

        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return Ok(false);
        }

        let ticket = match user.tickets_booked.iter().find(|t| t.matches_id(ticket_id)) {
            Some(ticket) => ticket.clone(),
            None => return Ok(false),
        };

        match self.catalog.find_by_id(&ticket.train_id) {
            Some(train) => {
                let mut train = train.clone();
                if let Err(err) = train.seats.release(ticket.row, ticket.seat) {
                    tracing::warn!(ticket = %ticket.ticket_id, %err, "seat release skipped");
                } else {
                    self.catalog.upsert(train)?;
                }
            }
            None => {
                tracing::warn!(
                    ticket = %ticket.ticket_id,
                    train = %ticket.train_id,
                    "cancelled ticket references a train missing from the catalog"
                );
            }
        }

        let removed = self.directory.remove_ticket(user_id, ticket_id)?;
        tracing::info!(ticket = %ticket.ticket_id, "booking cancelled");
        Ok(removed.is_some())
    }

    /// Repair the crash window between the train write and the user write.
    ///
    /// Tickets are the source of truth: occupied cells no ticket claims are
    /// freed, and cells a ticket claims but which are free are re-occupied.
    /// Returns the number of repaired cells.
    pub fn reconcile(&mut self) -> Result<usize, BookingError> {
        let mut claims: HashSet<(String, usize, usize)> = HashSet::new();
        for user in self.directory.users() {
            for ticket in &user.tickets_booked {
                claims.insert((ticket.train_id.to_lowercase(), ticket.row, ticket.seat));
            }
        }

        let mut repaired_trains = Vec::new();
        let mut repaired_cells = 0;

        for train in self.catalog.trains() {
            let mut fixed = train.clone();
            let key = fixed.train_id.to_lowercase();
            let mut changed = false;

            for (row, seat) in fixed.seats.occupied_cells() {
                if !claims.contains(&(key.clone(), row, seat)) {
                    // release on an in-bounds occupied cell cannot fail
                    let _ = fixed.seats.release(row, seat);
                    tracing::warn!(train = %fixed.train_id, row, seat, "freed orphaned seat");
                    changed = true;
                    repaired_cells += 1;
                }
            }

            for (claimed_train, row, seat) in &claims {
                if *claimed_train == key && fixed.seats.is_free(*row, *seat) {
                    if fixed.seats.occupy(*row, *seat).is_ok() {
                        tracing::warn!(train = %fixed.train_id, row, seat, "re-occupied ticketed seat");
                        changed = true;
                        repaired_cells += 1;
                    }
                }
            }

            if changed {
                repaired_trains.push(fixed);
            }
        }

        for train in repaired_trains {
            self.catalog.upsert(train)?;
        }

        if repaired_cells > 0 {
            tracing::info!(repaired_cells, "seat occupancy reconciled against tickets");
        }
        Ok(repaired_cells)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Usage error: an authenticated operation was invoked without a valid
    /// session. Distinct from every business failure below.
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("train not found: {0}")]
    TrainNotFound(String),

    #[error("seat ({row}, {seat}) not available")]
    SeatUnavailable { row: usize, seat: usize },

    // Field is named `origin` rather than `source` so thiserror does not
    // treat the station as the error's source cause.
    #[error("train {train_id} does not run {origin} -> {destination}")]
    InvalidRoute {
        train_id: String,
        origin: String,
        destination: String,
    },

    #[error("travel date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(DirectoryError),
}

impl From<DirectoryError> for BookingError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UnknownUser(_) => Self::NotAuthenticated,
            DirectoryError::Store(source) => Self::Store(source),
            other => Self::Directory(other),
        }
    }
}
