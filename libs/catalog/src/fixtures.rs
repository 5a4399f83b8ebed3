//! Seed fixtures for the catalog
//!
//! The catalog is rebuilt from three JSON arrays on every start:
//! `games.json`, `channels.json` and `videos.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    error::{FixtureError, FixtureResult},
    models::{NewChannel, NewGame, NewVideo},
    store::CatalogStore,
};

pub const GAMES_FILE: &str = "games.json";
pub const CHANNELS_FILE: &str = "channels.json";
pub const VIDEOS_FILE: &str = "videos.json";

/// Fixture records in file order
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub games: Vec<NewGame>,
    pub channels: Vec<NewChannel>,
    pub videos: Vec<NewVideo>,
}

/// Number of records created by [`FixtureSet::seed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub games: usize,
    pub channels: usize,
    pub videos: usize,
}

impl FixtureSet {
    /// Read the three fixture files from `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> FixtureResult<Self> {
        let dir = dir.as_ref();

        Ok(Self {
            games: read_json(dir.join(GAMES_FILE))?,
            channels: read_json(dir.join(CHANNELS_FILE))?,
            videos: read_json(dir.join(VIDEOS_FILE))?,
        })
    }

    /// Create every record in `store`. Games and channels go in before videos;
    /// video references are left for query time to resolve.
    pub fn seed(self, store: &mut CatalogStore) -> SeedSummary {
        let summary = SeedSummary {
            games: self.games.len(),
            channels: self.channels.len(),
            videos: self.videos.len(),
        };

        for game in self.games {
            store.create_game(game);
        }
        for channel in self.channels {
            store.create_channel(channel);
        }
        for video in self.videos {
            store.create_video(video);
        }

        info!(
            "Seeded catalog with {} games, {} channels, {} videos",
            summary.games, summary.channels, summary.videos
        );
        summary
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> FixtureResult<Vec<T>> {
    let raw = fs::read_to_string(&path).map_err(|source| FixtureError::Read {
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| FixtureError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_is_read_error() {
        let err = FixtureSet::load_dir("/definitely/not/here").unwrap_err();
        match err {
            FixtureError::Read { path, .. } => assert!(path.ends_with(GAMES_FILE)),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_keeps_fixture_ids() {
        let fixtures = FixtureSet {
            games: serde_json::from_str(
                r#"[{"id": 3, "name": "Dino Run", "slug": "dino-run", "thumbnailUrl": "g.png"}]"#,
            )
            .unwrap(),
            channels: serde_json::from_str(
                r#"[{"id": 8, "name": "Raptor Guides", "avatarUrl": "a.png"}]"#,
            )
            .unwrap(),
            videos: serde_json::from_str(
                r#"[{
                    "id": 12,
                    "title": "Speedrun basics",
                    "description": "Frame-perfect jumps",
                    "thumbnailUrl": "t.png",
                    "videoUrl": "v.mp4",
                    "duration": 95,
                    "views": 4100,
                    "gameId": 3,
                    "channelId": 8,
                    "createdAt": "2024-03-01T12:00:00Z"
                }]"#,
            )
            .unwrap(),
        };

        let mut store = CatalogStore::new();
        let summary = fixtures.seed(&mut store);

        assert_eq!(
            summary,
            SeedSummary {
                games: 1,
                channels: 1,
                videos: 1
            }
        );
        let video = store.get_video_with_details(12).unwrap().unwrap();
        assert_eq!(video.game.slug, "dino-run");
        assert_eq!(video.channel.subscriber_count, 0);
        assert_eq!(video.video.views, 4100);
        assert_eq!(video.video.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }
}
