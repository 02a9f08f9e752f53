//! Value objects - immutable, validated by construction.

mod names;

pub use names::{PlayerName, MAX_PLAYER_NAME_LENGTH};
