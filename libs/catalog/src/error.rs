//! Error types for the catalog library
//!
//! Lookups that miss return `None`. The errors here are reserved for data
//! that cannot be trusted: a stored video pointing at a game or channel that
//! does not exist, or fixture files that cannot be read.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Integrity failure raised while joining videos with their game and channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The video references a game id with no stored game
    #[error("Video {video_id} has invalid game reference {game_id}")]
    MissingGame { video_id: i32, game_id: i32 },

    /// The video references a channel id with no stored channel
    #[error("Video {video_id} has invalid channel reference {channel_id}")]
    MissingChannel { video_id: i32, channel_id: i32 },
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised while loading seed fixtures
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse fixture {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Result with FixtureError
pub type FixtureResult<T> = Result<T, FixtureError>;
