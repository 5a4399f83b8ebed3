//! Catalog library for the GameTube application
//!
//! This crate holds the in-memory catalog of games, channels, videos and
//! users, the queries the HTTP layer runs against it, and the fixture loader
//! that seeds it on startup.

pub mod error;
pub mod fixtures;
pub mod models;
pub mod store;

pub use error::{FixtureError, StoreError, StoreResult};
pub use fixtures::{FixtureSet, SeedSummary};
pub use store::CatalogStore;

/// Seeding a store from the bundled fixtures
///
/// ```rust,no_run
/// use catalog::{CatalogStore, FixtureSet};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut store = CatalogStore::new();
///     FixtureSet::load_dir("data")?.seed(&mut store);
///     for video in store.get_recommended_videos(1)? {
///         println!("{} ({})", video.video.title, video.game.name);
///     }
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
