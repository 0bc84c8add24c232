/// Weather module - condition input and the wind bias derived from it

pub mod condition;
pub mod codes;
pub mod wind;

// Re-export commonly used types
pub use condition::{Condition, UnknownCondition};
pub use wind::WindLevel;
