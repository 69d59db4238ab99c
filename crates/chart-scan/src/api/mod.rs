//! Public API: the [`ScoreExtractor`] builder and the [`ExtractError`]
//! error type.

mod builder;
mod error;

pub use builder::ScoreExtractor;
pub use error::ExtractError;
