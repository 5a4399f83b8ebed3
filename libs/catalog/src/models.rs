//! Catalog entities and their creation payloads
//!
//! Every `New*` payload carries an optional `id`. When it is present the store
//! keeps it as-is, which is how fixtures seed deterministic identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string, or empty for accounts created through GitHub
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<i32>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_picture: String,
}

/// Game category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub thumbnail_url: String,
}

/// New game creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub thumbnail_url: String,
}

/// Publishing channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i32,
    pub name: String,
    pub avatar_url: String,
    pub subscriber_count: i64,
}

/// New channel creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChannel {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub avatar_url: String,
    #[serde(default)]
    pub subscriber_count: i64,
}

/// Video guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    /// Length in seconds
    pub duration: i32,
    pub views: i64,
    pub game_id: i32,
    pub channel_id: i32,
    pub created_at: DateTime<Utc>,
}

/// New video creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    #[serde(default)]
    pub id: Option<i32>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: i32,
    #[serde(default)]
    pub views: i64,
    pub game_id: i32,
    pub channel_id: i32,
    /// Fixtures may pin the timestamp; otherwise the store stamps it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A video joined with the game and channel it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoWithDetails {
    #[serde(flatten)]
    pub video: Video,
    pub game: Game,
    pub channel: Channel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_omits_password() {
        let user = User {
            id: 1,
            username: "rex".to_string(),
            password: "$argon2id$secret".to_string(),
            email: String::new(),
            profile_picture: String::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["profilePicture"], "");
    }

    #[test]
    fn test_new_video_defaults() {
        let video: NewVideo = serde_json::from_str(
            r#"{
                "title": "Dragon Hunt",
                "description": "Tracking wyverns",
                "thumbnailUrl": "https://img/1.png",
                "videoUrl": "https://cdn/1.mp4",
                "duration": 300,
                "gameId": 1,
                "channelId": 2
            }"#,
        )
        .unwrap();

        assert_eq!(video.id, None);
        assert_eq!(video.views, 0);
        assert_eq!(video.created_at, None);
        assert_eq!(video.channel_id, 2);
    }

    #[test]
    fn test_video_with_details_is_flattened() {
        let details = VideoWithDetails {
            video: Video {
                id: 7,
                title: "t".to_string(),
                description: "d".to_string(),
                thumbnail_url: "th".to_string(),
                video_url: "v".to_string(),
                duration: 60,
                views: 3,
                game_id: 1,
                channel_id: 2,
                created_at: Utc::now(),
            },
            game: Game {
                id: 1,
                name: "Dino Run".to_string(),
                slug: "dino-run".to_string(),
                thumbnail_url: "g".to_string(),
            },
            channel: Channel {
                id: 2,
                name: "Raptor Guides".to_string(),
                avatar_url: "a".to_string(),
                subscriber_count: 0,
            },
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["gameId"], 1);
        assert_eq!(json["game"]["slug"], "dino-run");
        assert_eq!(json["channel"]["subscriberCount"], 0);
    }
}
