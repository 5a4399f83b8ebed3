//! In-memory catalog store
//!
//! Holds users, games, channels and videos in insertion-ordered maps keyed by
//! id. Records are only ever inserted. Video foreign keys are not checked on
//! insert; they are resolved when a query joins a video with its details, and
//! a dangling reference fails the whole query.

use std::collections::HashSet;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::warn;

use crate::{
    error::{StoreError, StoreResult},
    models::{
        Channel, Game, NewChannel, NewGame, NewUser, NewVideo, User, Video, VideoWithDetails,
    },
};

/// Below this many same-game candidates, recommendations are topped up with
/// other videos
pub const MIN_SAME_GAME_RECOMMENDATIONS: usize = 5;

/// Upper bound on the number of recommended videos
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Per-entity id counter
#[derive(Debug)]
struct IdSequence {
    next: i32,
}

impl IdSequence {
    fn new() -> Self {
        Self { next: 1 }
    }

    /// Use the caller's id if given, otherwise hand out the next counter value.
    /// The counter only moves on the auto-assign path and stops at `i32::MAX`;
    /// once there, every auto-assigned record lands on that id.
    fn resolve(&mut self, requested: Option<i32>) -> i32 {
        match requested {
            Some(id) => id,
            None => {
                let id = self.next;
                match self.next.checked_add(1) {
                    Some(next) => self.next = next,
                    None => warn!("Id sequence exhausted at {}", id),
                }
                id
            }
        }
    }
}

/// Catalog store
#[derive(Debug)]
pub struct CatalogStore {
    users: IndexMap<i32, User>,
    games: IndexMap<i32, Game>,
    channels: IndexMap<i32, Channel>,
    videos: IndexMap<i32, Video>,

    user_ids: IdSequence,
    game_ids: IdSequence,
    channel_ids: IdSequence,
    video_ids: IdSequence,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: IndexMap::new(),
            games: IndexMap::new(),
            channels: IndexMap::new(),
            videos: IndexMap::new(),
            user_ids: IdSequence::new(),
            game_ids: IdSequence::new(),
            channel_ids: IdSequence::new(),
            video_ids: IdSequence::new(),
        }
    }

    // Users

    /// Store a new user. Username uniqueness is the caller's concern.
    pub fn create_user(&mut self, new_user: NewUser) -> User {
        let id = self.user_ids.resolve(new_user.id);
        let user = User {
            id,
            username: new_user.username,
            password: new_user.password,
            email: new_user.email,
            profile_picture: new_user.profile_picture,
            created_at: Utc::now(),
        };

        if self.users.insert(id, user.clone()).is_some() {
            warn!("User id {} was already taken; previous record replaced", id);
        }
        user
    }

    pub fn get_user(&self, id: i32) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// Exact, case-sensitive username match
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    // Games

    pub fn create_game(&mut self, new_game: NewGame) -> Game {
        let id = self.game_ids.resolve(new_game.id);
        let game = Game {
            id,
            name: new_game.name,
            slug: new_game.slug,
            thumbnail_url: new_game.thumbnail_url,
        };

        if self.games.insert(id, game.clone()).is_some() {
            warn!("Game id {} was already taken; previous record replaced", id);
        }
        game
    }

    pub fn get_all_games(&self) -> Vec<Game> {
        self.games.values().cloned().collect()
    }

    pub fn get_game(&self, id: i32) -> Option<Game> {
        self.games.get(&id).cloned()
    }

    pub fn get_game_by_slug(&self, slug: &str) -> Option<Game> {
        self.games.values().find(|game| game.slug == slug).cloned()
    }

    // Channels

    pub fn create_channel(&mut self, new_channel: NewChannel) -> Channel {
        let id = self.channel_ids.resolve(new_channel.id);
        let channel = Channel {
            id,
            name: new_channel.name,
            avatar_url: new_channel.avatar_url,
            subscriber_count: new_channel.subscriber_count,
        };

        if self.channels.insert(id, channel.clone()).is_some() {
            warn!("Channel id {} was already taken; previous record replaced", id);
        }
        channel
    }

    pub fn get_all_channels(&self) -> Vec<Channel> {
        self.channels.values().cloned().collect()
    }

    pub fn get_channel(&self, id: i32) -> Option<Channel> {
        self.channels.get(&id).cloned()
    }

    // Videos

    /// Store a new video. Game and channel ids are resolved at query time.
    pub fn create_video(&mut self, new_video: NewVideo) -> Video {
        let id = self.video_ids.resolve(new_video.id);
        let video = Video {
            id,
            title: new_video.title,
            description: new_video.description,
            thumbnail_url: new_video.thumbnail_url,
            video_url: new_video.video_url,
            duration: new_video.duration,
            views: new_video.views,
            game_id: new_video.game_id,
            channel_id: new_video.channel_id,
            created_at: new_video.created_at.unwrap_or_else(Utc::now),
        };

        if self.videos.insert(id, video.clone()).is_some() {
            warn!("Video id {} was already taken; previous record replaced", id);
        }
        video
    }

    pub fn get_all_videos(&self) -> Vec<Video> {
        self.videos.values().cloned().collect()
    }

    pub fn get_all_videos_with_details(&self) -> StoreResult<Vec<VideoWithDetails>> {
        self.with_details_all(self.videos.values())
    }

    pub fn get_video(&self, id: i32) -> Option<Video> {
        self.videos.get(&id).cloned()
    }

    /// `Ok(None)` if the video is unknown; an error if it exists but its
    /// references dangle
    pub fn get_video_with_details(&self, id: i32) -> StoreResult<Option<VideoWithDetails>> {
        self.videos
            .get(&id)
            .map(|video| self.with_details(video))
            .transpose()
    }

    pub fn get_videos_by_game_id(&self, game_id: i32) -> StoreResult<Vec<VideoWithDetails>> {
        self.with_details_all(self.videos.values().filter(|video| video.game_id == game_id))
    }

    /// Unknown slugs yield an empty list rather than an error
    pub fn get_videos_by_game_slug(&self, slug: &str) -> StoreResult<Vec<VideoWithDetails>> {
        match self.games.values().find(|game| game.slug == slug) {
            Some(game) => self.get_videos_by_game_id(game.id),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_videos_by_channel_id(&self, channel_id: i32) -> StoreResult<Vec<VideoWithDetails>> {
        self.with_details_all(
            self.videos
                .values()
                .filter(|video| video.channel_id == channel_id),
        )
    }

    /// Same-game videos first, topped up with the rest of the catalog when
    /// there are fewer than [`MIN_SAME_GAME_RECOMMENDATIONS`], capped at
    /// [`MAX_RECOMMENDATIONS`]. Both groups keep insertion order and the seed
    /// video is never included.
    pub fn get_recommended_videos(&self, video_id: i32) -> StoreResult<Vec<VideoWithDetails>> {
        let Some(seed) = self.videos.get(&video_id) else {
            return Ok(Vec::new());
        };

        let mut picked: Vec<&Video> = self
            .videos
            .values()
            .filter(|video| video.game_id == seed.game_id && video.id != video_id)
            .collect();

        if picked.len() < MIN_SAME_GAME_RECOMMENDATIONS {
            let taken: HashSet<i32> = picked.iter().map(|video| video.id).collect();
            picked.extend(
                self.videos
                    .values()
                    .filter(|video| video.id != video_id && !taken.contains(&video.id)),
            );
        }

        picked.truncate(MAX_RECOMMENDATIONS);
        self.with_details_all(picked)
    }

    /// Case-insensitive substring match on title or description. An empty
    /// query matches nothing.
    pub fn search_videos(&self, query: &str) -> StoreResult<Vec<VideoWithDetails>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        self.with_details_all(self.videos.values().filter(|video| {
            video.title.to_lowercase().contains(&needle)
                || video.description.to_lowercase().contains(&needle)
        }))
    }

    fn with_details(&self, video: &Video) -> StoreResult<VideoWithDetails> {
        let game = self
            .games
            .get(&video.game_id)
            .ok_or(StoreError::MissingGame {
                video_id: video.id,
                game_id: video.game_id,
            })?;
        let channel = self
            .channels
            .get(&video.channel_id)
            .ok_or(StoreError::MissingChannel {
                video_id: video.id,
                channel_id: video.channel_id,
            })?;

        Ok(VideoWithDetails {
            video: video.clone(),
            game: game.clone(),
            channel: channel.clone(),
        })
    }

    fn with_details_all<'a>(
        &self,
        videos: impl IntoIterator<Item = &'a Video>,
    ) -> StoreResult<Vec<VideoWithDetails>> {
        videos
            .into_iter()
            .map(|video| self.with_details(video))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_sequence_stops_at_max() {
        let mut ids = IdSequence { next: i32::MAX - 1 };

        assert_eq!(ids.resolve(None), i32::MAX - 1);
        assert_eq!(ids.resolve(None), i32::MAX);
        assert_eq!(ids.resolve(None), i32::MAX);
        assert_eq!(ids.resolve(Some(3)), 3);
        assert_eq!(ids.next, i32::MAX);
    }

    fn new_game(id: Option<i32>, slug: &str) -> NewGame {
        NewGame {
            id,
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            thumbnail_url: format!("https://img.example.com/{slug}.png"),
        }
    }

    fn new_channel(id: Option<i32>) -> NewChannel {
        NewChannel {
            id,
            name: "Raptor Guides".to_string(),
            avatar_url: "https://img.example.com/raptor.png".to_string(),
            subscriber_count: 1200,
        }
    }

    fn new_video(id: Option<i32>, title: &str, game_id: i32, channel_id: i32) -> NewVideo {
        NewVideo {
            id,
            title: title.to_string(),
            description: format!("{title} walkthrough"),
            thumbnail_url: "https://img.example.com/v.png".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            duration: 420,
            views: 0,
            game_id,
            channel_id,
            created_at: None,
        }
    }

    /// Two games, one channel. Game 1 holds `same_game` videos after the seed
    /// (id 1); game 2 holds `other` videos.
    fn store_for_recommendations(same_game: i32, other: i32) -> CatalogStore {
        let mut store = CatalogStore::new();
        store.create_game(new_game(Some(1), "dino-run"));
        store.create_game(new_game(Some(2), "fossil-quest"));
        store.create_channel(new_channel(Some(1)));

        store.create_video(new_video(None, "seed", 1, 1));
        for i in 0..other {
            store.create_video(new_video(None, &format!("other {i}"), 2, 1));
        }
        for i in 0..same_game {
            store.create_video(new_video(None, &format!("same {i}"), 1, 1));
        }
        store
    }

    fn ids(videos: &[VideoWithDetails]) -> Vec<i32> {
        videos.iter().map(|v| v.video.id).collect()
    }

    #[test]
    fn test_auto_assigned_ids_start_at_one() {
        let mut store = CatalogStore::new();

        let first = store.create_game(new_game(None, "a"));
        let second = store.create_game(new_game(None, "b"));
        let channel = store.create_channel(new_channel(None));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(channel.id, 1);
    }

    #[test]
    fn test_explicit_id_does_not_advance_counter() {
        let mut store = CatalogStore::new();

        let pinned = store.create_game(new_game(Some(40), "pinned"));
        let auto = store.create_game(new_game(None, "auto"));

        assert_eq!(pinned.id, 40);
        assert_eq!(auto.id, 1);
        assert_eq!(store.get_game(40), Some(pinned));
    }

    #[test]
    fn test_created_records_round_trip() {
        let mut store = CatalogStore::new();

        let game = store.create_game(new_game(None, "dino-run"));
        let channel = store.create_channel(new_channel(None));
        let video = store.create_video(new_video(None, "Dragon Hunt", game.id, channel.id));
        let user = store.create_user(NewUser {
            username: "rex".to_string(),
            password: "hash".to_string(),
            ..Default::default()
        });

        assert_eq!(store.get_game(game.id), Some(game));
        assert_eq!(store.get_channel(channel.id), Some(channel));
        assert_eq!(store.get_video(video.id), Some(video));
        assert_eq!(store.get_user(user.id), Some(user.clone()));
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_username_lookup_is_case_sensitive() {
        let mut store = CatalogStore::new();
        store.create_user(NewUser {
            username: "Rex".to_string(),
            password: String::new(),
            ..Default::default()
        });

        assert!(store.get_user_by_username("Rex").is_some());
        assert!(store.get_user_by_username("rex").is_none());
    }

    #[test]
    fn test_games_keep_insertion_order() {
        let mut store = CatalogStore::new();
        store.create_game(new_game(Some(9), "z"));
        store.create_game(new_game(Some(3), "a"));
        store.create_game(new_game(Some(5), "m"));

        let slugs: Vec<String> = store.get_all_games().into_iter().map(|g| g.slug).collect();
        assert_eq!(slugs, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_unknown_slug_is_absent_not_error() {
        let store = store_for_recommendations(1, 1);

        assert!(store.get_game_by_slug("nope").is_none());
        assert_eq!(store.get_videos_by_game_slug("nope"), Ok(Vec::new()));
    }

    #[test]
    fn test_videos_by_game_slug() {
        let store = store_for_recommendations(2, 3);

        let videos = store.get_videos_by_game_slug("dino-run").unwrap();
        assert_eq!(ids(&videos), vec![1, 5, 6]);
        assert!(videos.iter().all(|v| v.game.slug == "dino-run"));
    }

    #[test]
    fn test_videos_by_channel_id() {
        let mut store = store_for_recommendations(1, 1);
        store.create_channel(new_channel(Some(2)));
        store.create_video(new_video(Some(50), "elsewhere", 1, 2));

        assert_eq!(ids(&store.get_videos_by_channel_id(2).unwrap()), vec![50]);
        assert!(store.get_videos_by_channel_id(99).unwrap().is_empty());
    }

    #[test]
    fn test_dangling_game_fails_whole_listing() {
        let mut store = store_for_recommendations(1, 1);
        store.create_video(new_video(Some(77), "orphan", 999, 1));

        assert_eq!(
            store.get_all_videos_with_details(),
            Err(StoreError::MissingGame {
                video_id: 77,
                game_id: 999
            })
        );
        // Raw listing does not join
        assert_eq!(store.get_all_videos().len(), 4);
    }

    #[test]
    fn test_video_with_details_absent_vs_dangling() {
        let mut store = store_for_recommendations(0, 0);
        store.create_video(new_video(Some(8), "lost channel", 1, 42));

        assert_eq!(store.get_video_with_details(1234), Ok(None));
        assert_eq!(
            store.get_video_with_details(8),
            Err(StoreError::MissingChannel {
                video_id: 8,
                channel_id: 42
            })
        );

        let seed = store.get_video_with_details(1).unwrap().unwrap();
        assert_eq!(seed.game.id, 1);
        assert_eq!(seed.channel.id, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut store = store_for_recommendations(0, 0);
        store.create_video(new_video(Some(20), "Dragon Hunt", 1, 1));
        let mut by_description = new_video(Some(21), "Cave run", 1, 1);
        by_description.description = "Sneaking past a dragon".to_string();
        store.create_video(by_description);

        assert_eq!(ids(&store.search_videos("DRAGON").unwrap()), vec![20, 21]);
        assert!(store.search_videos("").unwrap().is_empty());
        assert!(store.search_videos("kraken").unwrap().is_empty());
    }

    #[test]
    fn test_empty_search_skips_integrity_check() {
        let mut store = CatalogStore::new();
        store.create_video(new_video(None, "orphan", 1, 1));

        assert_eq!(store.search_videos(""), Ok(Vec::new()));
        assert!(store.search_videos("orphan").is_err());
    }

    #[test]
    fn test_recommendations_unknown_seed() {
        let store = store_for_recommendations(2, 2);
        assert_eq!(store.get_recommended_videos(404), Ok(Vec::new()));
    }

    #[test]
    fn test_recommendations_fill_with_other_videos() {
        // Seed is id 1, ten other-game videos are 2..=11, same-game are 12 and 13
        let store = store_for_recommendations(2, 10);

        let recommended = ids(&store.get_recommended_videos(1).unwrap());

        assert_eq!(recommended.len(), MAX_RECOMMENDATIONS);
        assert_eq!(&recommended[..2], &[12, 13]);
        assert_eq!(&recommended[2..], &[2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(!recommended.contains(&1));
    }

    #[test]
    fn test_recommendations_enough_same_game() {
        let store = store_for_recommendations(6, 4);

        let recommended = store.get_recommended_videos(1).unwrap();

        assert_eq!(ids(&recommended), vec![6, 7, 8, 9, 10, 11]);
        assert!(recommended.iter().all(|v| v.video.game_id == 1));
    }

    #[test]
    fn test_recommendations_capped_at_max() {
        let store = store_for_recommendations(15, 0);
        let recommended = ids(&store.get_recommended_videos(1).unwrap());
        assert_eq!(recommended, (2..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_recommendations_fail_on_dangling_candidate() {
        let mut store = store_for_recommendations(1, 0);
        store.create_video(new_video(Some(30), "orphan", 1, 999));

        assert!(matches!(
            store.get_recommended_videos(1),
            Err(StoreError::MissingChannel { video_id: 30, .. })
        ));
    }
}
