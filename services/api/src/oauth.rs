//! GitHub OAuth2 login

use anyhow::Result;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl, basic::BasicClient, reqwest::async_http_client,
};
use serde::Deserialize;
use tracing::info;

use crate::{config::GithubConfig, repositories::user::ExternalProfile};

/// Name of the cookie carrying the CSRF state between redirect and callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "gametube-api";

/// GitHub `/user` response
#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    email: Option<String>,
    avatar_url: Option<String>,
}

/// GitHub `/user/emails` entry
#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
}

/// OAuth2 client for GitHub
#[derive(Clone)]
pub struct GithubOAuth {
    client: BasicClient,
    http: reqwest::Client,
}

impl GithubOAuth {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            AuthUrl::new(AUTHORIZE_URL.to_string())?,
            Some(TokenUrl::new(TOKEN_URL.to_string())?),
        )
        .set_redirect_uri(RedirectUrl::new(config.callback_url.clone())?);

        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, http })
    }

    /// Authorization URL asking for `user:email`, plus the CSRF state to
    /// check on the way back
    pub fn authorize_url(&self) -> (String, CsrfToken) {
        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("user:email".to_string()))
            .url();

        (auth_url.to_string(), csrf_token)
    }

    /// Exchange the callback code and fetch the GitHub profile behind it
    pub async fn fetch_profile(&self, code: String) -> Result<ExternalProfile> {
        info!("Exchanging GitHub authorization code");

        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to exchange GitHub code: {}", e))?;
        let access_token = token.access_token().secret();

        let user: GithubUser = self
            .http
            .get(format!("{}/user", API_BASE_URL))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let email = match user.email {
            Some(email) => Some(email),
            None => self.primary_email(access_token).await?,
        };

        Ok(ExternalProfile {
            username: user.login,
            email,
            avatar_url: user.avatar_url,
        })
    }

    /// Primary address from `/user/emails`, falling back to the first listed
    async fn primary_email(&self, access_token: &str) -> Result<Option<String>> {
        let emails: Vec<GithubEmail> = self
            .http
            .get(format!("{}/user/emails", API_BASE_URL))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(pick_email(emails))
    }
}

fn pick_email(emails: Vec<GithubEmail>) -> Option<String> {
    let primary = emails.iter().position(|e| e.primary).unwrap_or(0);
    emails.into_iter().nth(primary).map(|e| e.email)
}
