pub mod catalog;
pub mod train;

pub use catalog::TrainCatalog;
pub use train::{SeatError, SeatMatrix, Train};
