pub mod gof;

pub use gof::{check_normality, NormalityCheck, DEFAULT_SIGNIFICANCE, SHAPIRO_WILK_CAP};
