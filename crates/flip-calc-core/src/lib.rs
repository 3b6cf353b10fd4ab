pub mod deal;
pub mod error;
pub mod types;

#[cfg(feature = "regions")]
pub mod regions;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::FlipCalcError;
pub use types::*;

/// Standard result type for all flip-calc operations
pub type FlipCalcResult<T> = Result<T, FlipCalcError>;
