pub mod directory;
pub mod password;
pub mod user;

pub use directory::{DirectoryError, UserDirectory};
pub use user::User;
