//! Standard rule implementations.

pub mod author;
pub mod flair;
pub mod pattern;
pub mod predicate;

pub use author::AuthorRule;
pub use flair::FlairRule;
pub use pattern::PatternRule;
pub use predicate::PredicateRule;
