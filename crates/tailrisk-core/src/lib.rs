pub mod error;
pub mod estimator;
pub mod normality;
pub mod simulate;
pub mod stats;
pub mod study;
pub mod types;

pub use error::TailRiskError;
pub use types::*;

/// Standard result type for all tailrisk operations
pub type TailRiskResult<T> = Result<T, TailRiskError>;
