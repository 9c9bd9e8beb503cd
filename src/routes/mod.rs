pub mod evaluations;

pub mod evaluator;

pub mod standards;

pub use evaluations::configure_evaluation_routes;
pub use evaluator::configure_evaluator_routes;
pub use standards::configure_standards_routes;
