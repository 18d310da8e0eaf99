pub mod session;
pub mod ticket;

pub use session::Session;
pub use ticket::Ticket;
