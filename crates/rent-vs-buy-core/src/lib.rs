pub mod amortization;
pub mod comparison;
pub mod error;
pub mod types;

pub use error::RentVsBuyError;
pub use types::*;

/// Standard result type for all rent-vs-buy operations
pub type RentVsBuyResult<T> = Result<T, RentVsBuyError>;
