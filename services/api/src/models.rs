//! API models for request and response payloads

use catalog::models::User;
use serde::{Deserialize, Serialize};

/// Request for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response carrying the logged-in user
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: User,
}

impl UserEnvelope {
    pub fn new(user: User) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Query string for video search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Request for mailing code updates
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

/// Query string GitHub appends to the callback
#[derive(Debug, Deserialize)]
pub struct GithubCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
