pub mod var_es;

pub use var_es::{
    compute_errors, empirical_var_es, parametric_normal_var_es, theoretical_var_es, ErrorMetrics,
    EstimatePair,
};
