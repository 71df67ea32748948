pub mod error;
pub mod timing;

pub use error::{AppError, Result};
pub use timing::timed;
