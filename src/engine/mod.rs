//! Pure computation engine for recipe profit figures.

pub mod evaluator;

pub use evaluator::{evaluate_with, EvalError, Evaluation, Evaluator};
