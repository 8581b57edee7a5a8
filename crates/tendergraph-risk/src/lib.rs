pub mod engine;
pub mod rules;
pub mod score;

pub use engine::{RiskEngine, Snapshot};
pub use score::{advisory_for, aggregate, categorize, recommend, NO_ACTION_ADVICE};
