//! Application state shared across handlers

use crate::{
    email::EmailClient,
    oauth::GithubOAuth,
    repositories::{CatalogRepository, user::UserRepository},
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogRepository,
    pub user_repository: UserRepository,
    pub sessions: SessionManager,
    /// `None` while GitHub login is not configured
    pub github: Option<GithubOAuth>,
    pub email_client: EmailClient,
}
