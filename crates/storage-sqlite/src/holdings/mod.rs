mod model;
mod repository;

pub use model::{HoldingDB, NewHoldingDB};
pub use repository::HoldingRepository;
