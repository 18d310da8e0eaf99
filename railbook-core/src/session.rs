use uuid::Uuid;

/// Proof of a completed login, passed explicitly into every authenticated
/// operation. Holding a value of this type is the only way to call them;
/// there is no global current-user state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub name: String,
}

impl Session {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}
