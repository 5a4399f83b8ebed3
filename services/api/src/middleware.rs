//! Session middleware for routes that need a logged-in user

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use catalog::models::User;

use crate::{error::AuthError, session::SESSION_COOKIE, state::AppState};

/// The logged-in user, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Resolve the session cookie to a user or reject with 401
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = current_user(&state, &CookieJar::from_headers(req.headers()))
        .await
        .ok_or(AuthError::NotAuthenticated)?;

    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}

/// User behind the request's session cookie, if the session is live
pub async fn current_user(state: &AppState, jar: &CookieJar) -> Option<User> {
    let token = jar.get(SESSION_COOKIE)?;
    let user_id = state.sessions.resolve(token.value()).await?;
    state.user_repository.find_by_id(user_id).await
}
