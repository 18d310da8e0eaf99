use crate::password::{self, PasswordError};
use crate::user::User;
use railbook_core::Ticket;
use railbook_store::{JsonStore, StoreError};
use uuid::Uuid;

/// Owns the persisted set of registered users.
///
/// Loaded whole at construction; any mutation to a user's ticket list
/// rewrites the whole backing file.
pub struct UserDirectory {
    store: JsonStore<User>,
    users: Vec<User>,
}

impl UserDirectory {
    pub fn open(store: JsonStore<User>) -> Result<Self, StoreError> {
        let users = store.load()?;
        tracing::info!(users = users.len(), "user directory loaded");
        Ok(Self { store, users })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_by_id(&self, user_id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    /// Register a new user. A taken name (case-insensitive) is a normal
    /// negative outcome, reported as `AlreadyExists` so callers can tell
    /// it apart from an I/O fault. The plaintext is hashed and dropped.
    pub fn sign_up(&mut self, name: &str, password: &str) -> Result<User, DirectoryError> {
        let name = name.trim();
        if self.users.iter().any(|u| u.matches_name(name)) {
            return Err(DirectoryError::AlreadyExists(name.to_string()));
        }

        let hashed = password::hash_password(password)?;
        let user = User::new(name, hashed);
        self.users.push(user.clone());
        self.store.save(&self.users)?;

        tracing::info!(user = %user.name, "user signed up");
        Ok(user)
    }

    /// Case-insensitive name match, then hash verification. Bad name and
    /// bad password are indistinguishable to the caller: both are `None`.
    pub fn authenticate(&self, name: &str, password: &str) -> Result<Option<User>, DirectoryError> {
        for user in self.users.iter().filter(|u| u.matches_name(name)) {
            if password::verify_password(password, &user.hashed_password)? {
                return Ok(Some(user.clone()));
            }
        }
        Ok(None)
    }

    /// Append a ticket to its owner's list and persist the directory.
    pub fn add_ticket(&mut self, user_id: Uuid, ticket: Ticket) -> Result<(), DirectoryError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(DirectoryError::UnknownUser(user_id))?;

        user.tickets_booked.push(ticket);
        self.store.save(&self.users)?;
        Ok(())
    }

    /// Remove a ticket from its owner's list by exact identifier match and
    /// persist the directory. Returns the removed ticket, or `None` when
    /// the id does not name a ticket of this user (no mutation then).
    pub fn remove_ticket(
        &mut self,
        user_id: Uuid,
        ticket_id: &str,
    ) -> Result<Option<Ticket>, DirectoryError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(DirectoryError::UnknownUser(user_id))?;

        let position = user
            .tickets_booked
            .iter()
            .position(|t| t.matches_id(ticket_id));

        match position {
            Some(index) => {
                let removed = user.tickets_booked.remove(index);
                self.store.save(&self.users)?;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user name already taken: {0}")]
    AlreadyExists(String),

    #[error("no such user: {0}")]
    UnknownUser(Uuid),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
