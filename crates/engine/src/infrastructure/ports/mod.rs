//! Port traits for infrastructure boundaries.
//!
//! Game code depends on these traits only:
//! - `DataContext` and its repositories for storage
//! - `ClockPort` and `RandomPort` so tests control time and dice

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::*;
pub use testing::*;
