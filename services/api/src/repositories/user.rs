//! User repository: account creation and password checks

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use catalog::models::{NewUser, User};
use tracing::{info, warn};

use super::SharedStore;

/// Avatar used when an account has none of its own
pub fn default_avatar(username: &str) -> String {
    format!("https://api.dicebear.com/6.x/bottts/svg?seed={}", username)
}

/// Result of a registration attempt
#[derive(Debug)]
pub enum Registration {
    Created(User),
    UsernameTaken,
}

/// Profile handed back by an external identity provider
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    pub username: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Register a local account. The username check and the insert happen
    /// under one write lock.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Registration> {
        info!("Registering new user: {}", username);

        let password_hash = hash_password(password)?;

        let mut store = self.store.write().await;
        if store.get_user_by_username(username).is_some() {
            return Ok(Registration::UsernameTaken);
        }

        let user = store.create_user(NewUser {
            id: None,
            username: username.to_string(),
            password: password_hash,
            email: email.to_string(),
            profile_picture: default_avatar(username),
        });

        Ok(Registration::Created(user))
    }

    /// Return the user for an external login, creating a password-less
    /// account on first sight. `None` when the username belongs to a local
    /// account with a password, which an external login never takes over.
    pub async fn find_or_create_external(&self, profile: ExternalProfile) -> Option<User> {
        let mut store = self.store.write().await;
        if let Some(user) = store.get_user_by_username(&profile.username) {
            if !user.password.is_empty() {
                warn!(
                    "External login refused for password account: {}",
                    profile.username
                );
                return None;
            }
            return Some(user);
        }

        info!("Creating account for external user: {}", profile.username);
        let profile_picture = profile
            .avatar_url
            .unwrap_or_else(|| default_avatar(&profile.username));

        Some(store.create_user(NewUser {
            id: None,
            username: profile.username,
            password: String::new(),
            email: profile.email.unwrap_or_default(),
            profile_picture,
        }))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Option<User> {
        self.store.read().await.get_user(id)
    }

    /// Look up a user and check the password. `None` covers both an unknown
    /// username and a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let user = self.store.read().await.get_user_by_username(username)?;
        verify_password(&user, password).then_some(user)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Accounts without a stored hash (GitHub logins) never match
fn verify_password(user: &User, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(&user.password) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
