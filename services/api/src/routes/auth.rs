//! Account routes: registration, password login, logout and GitHub OAuth

use std::time::Duration;

use anyhow::{Context, bail};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use catalog::models::User;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    error::AuthError,
    middleware::AuthUser,
    models::{GithubCallback, LoginRequest, RegisterRequest, UserEnvelope},
    oauth::OAUTH_STATE_COOKIE,
    repositories::user::Registration,
    session::SESSION_COOKIE,
    state::AppState,
    validation::validate_email,
};

/// How long a GitHub authorization round trip may take
const OAUTH_STATE_TTL: time::Duration = time::Duration::minutes(10);

fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        ))
        .build()
}

/// Start a session for `user` and attach its cookie
async fn log_in(state: &AppState, jar: CookieJar, user: &User) -> CookieJar {
    let token = state.sessions.create_session(user.id).await;
    jar.add(session_cookie(token, state.sessions.ttl()))
}

/// Register a local account and log it in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    if !payload.email.is_empty() {
        validate_email(&payload.email).map_err(AuthError::InvalidInput)?;
    }

    let registration = state
        .user_repository
        .register(&payload.username, &payload.password, &payload.email)
        .await
        .map_err(|e| {
            error!("Registration error: {}", e);
            AuthError::Internal("An error occurred during registration".to_string())
        })?;

    let user = match registration {
        Registration::Created(user) => user,
        Registration::UsernameTaken => return Err(AuthError::UsernameTaken),
    };

    let jar = log_in(&state, jar, &user).await;
    Ok((StatusCode::CREATED, jar, Json(UserEnvelope::new(user))))
}

/// Password login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .user_repository
        .authenticate(&payload.username, &payload.password)
        .await
        .ok_or(AuthError::InvalidCredentials)?;

    let jar = log_in(&state, jar, &user).await;
    Ok((jar, Json(UserEnvelope::new(user))))
}

/// Drop the current session, if any
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value()).await;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(json!({ "success": true })))
}

/// The logged-in user; sits behind the session middleware
pub async fn current_user(Extension(AuthUser(user)): Extension<AuthUser>) -> impl IntoResponse {
    Json(UserEnvelope::new(user))
}

/// Redirect to GitHub's consent page
pub async fn github_login(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let Some(github) = &state.github else {
        warn!("GitHub login requested but no client id is configured");
        return (jar, Redirect::to("/login"));
    };

    let (auth_url, csrf_token) = github.authorize_url();
    let state_cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_token.secret().clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(OAUTH_STATE_TTL);

    (jar.add(state_cookie), Redirect::to(&auth_url))
}

/// Finish the GitHub round trip; `/` on success, `/login` otherwise
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<GithubCallback>,
) -> impl IntoResponse {
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/"));

    match complete_github_login(&state, query, expected_state).await {
        Ok(user) => {
            info!("GitHub login for user: {}", user.username);
            let jar = log_in(&state, jar, &user).await;
            (jar, Redirect::to("/"))
        }
        Err(e) => {
            warn!("GitHub login failed: {:#}", e);
            (jar, Redirect::to("/login"))
        }
    }
}

async fn complete_github_login(
    state: &AppState,
    query: GithubCallback,
    expected_state: Option<String>,
) -> anyhow::Result<User> {
    let github = state
        .github
        .as_ref()
        .context("GitHub login is not configured")?;

    if let Some(error) = query.error {
        bail!("GitHub returned an error: {}", error);
    }

    match (query.state, expected_state) {
        (Some(received), Some(expected)) if received == expected => {}
        _ => bail!("OAuth state mismatch"),
    }

    let code = query.code.context("Missing authorization code")?;
    let profile = github.fetch_profile(code).await?;

    state
        .user_repository
        .find_or_create_external(profile)
        .await
        .context("GitHub login matches a password-protected local account")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_max_age_never_wraps() {
        let cookie = session_cookie("token".to_string(), Duration::from_secs(u64::MAX));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(i64::MAX))
        );

        let cookie = session_cookie("token".to_string(), Duration::from_secs(3600));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
