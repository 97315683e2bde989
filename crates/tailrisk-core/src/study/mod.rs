pub mod convergence;

pub use convergence::{
    run_convergence_study, ParametricEstimate, SampleSizeResult, StudyInput, StudyOutput,
};
