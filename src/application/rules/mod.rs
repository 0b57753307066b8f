//! Rules engine - condition evaluation and trigger selection

pub mod evaluator;
pub mod selector;

pub use evaluator::{ConditionEvaluator, Dice, ThreadDice};
pub use selector::{Selection, TriggerSelector};
