pub mod aggregation;
pub mod evaluations;
pub mod standards;

pub use evaluations::EvaluationService;
pub use standards::StandardService;
