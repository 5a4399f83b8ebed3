//! Repositories over the shared catalog store
//!
//! The store itself is synchronous. Repositories own the async boundary so
//! handlers can await them, and take the lock for exactly one store call.

use std::sync::Arc;

use catalog::{
    CatalogStore, StoreResult,
    models::{Channel, Game, VideoWithDetails},
};
use tokio::sync::RwLock;

pub mod user;

/// Shared handle to the catalog store
pub type SharedStore = Arc<RwLock<CatalogStore>>;

/// Catalog repository for read queries
#[derive(Clone)]
pub struct CatalogRepository {
    store: SharedStore,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn get_all_videos_with_details(&self) -> StoreResult<Vec<VideoWithDetails>> {
        self.store.read().await.get_all_videos_with_details()
    }

    pub async fn get_video_with_details(&self, id: i32) -> StoreResult<Option<VideoWithDetails>> {
        self.store.read().await.get_video_with_details(id)
    }

    pub async fn get_videos_by_game_slug(&self, slug: &str) -> StoreResult<Vec<VideoWithDetails>> {
        self.store.read().await.get_videos_by_game_slug(slug)
    }

    pub async fn get_videos_by_channel_id(
        &self,
        channel_id: i32,
    ) -> StoreResult<Vec<VideoWithDetails>> {
        self.store.read().await.get_videos_by_channel_id(channel_id)
    }

    pub async fn get_recommended_videos(&self, video_id: i32) -> StoreResult<Vec<VideoWithDetails>> {
        self.store.read().await.get_recommended_videos(video_id)
    }

    pub async fn search_videos(&self, query: &str) -> StoreResult<Vec<VideoWithDetails>> {
        self.store.read().await.search_videos(query)
    }

    pub async fn get_all_games(&self) -> Vec<Game> {
        self.store.read().await.get_all_games()
    }

    pub async fn get_game_by_slug(&self, slug: &str) -> Option<Game> {
        self.store.read().await.get_game_by_slug(slug)
    }

    pub async fn get_all_channels(&self) -> Vec<Channel> {
        self.store.read().await.get_all_channels()
    }

    pub async fn get_channel(&self, id: i32) -> Option<Channel> {
        self.store.read().await.get_channel(id)
    }
}
