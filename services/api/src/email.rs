//! Outbound email through SendGrid's v3 mail API

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::EmailConfig;

const CODE_UPDATES_SUBJECT: &str = "GameTube Code Updates";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SendGrid API key not found")]
    MissingApiKey,

    #[error("Failed to reach SendGrid: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SendGrid rejected the message with status {0}")]
    Rejected(reqwest::StatusCode),
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Clone, Debug)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    from_address: String,
}

impl EmailClient {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        }
    }

    #[tracing::instrument(name = "send_email", skip(self, html), fields(recipient = %recipient))]
    pub async fn send_email(&self, recipient: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        if self.api_key.is_empty() {
            error!("SendGrid API key not found");
            return Err(EmailError::MissingApiKey);
        }

        let request_body = SendEmailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: recipient }],
            }],
            from: Address {
                email: &self.from_address,
            },
            subject,
            content: vec![Content {
                content_type: "text/html",
                value: html,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                error!("SendGrid email error: {:?}", err);
                EmailError::Request(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("SendGrid rejected email to {}: {}", recipient, status);
            return Err(EmailError::Rejected(status));
        }

        info!("Email sent successfully to {}", recipient);
        Ok(())
    }

    /// Mail a block of code updates to `recipient`
    pub async fn send_code_updates(&self, recipient: &str, updates: &str) -> Result<(), EmailError> {
        let html = render_code_updates(updates);
        self.send_email(recipient, CODE_UPDATES_SUBJECT, &html).await
    }
}

fn render_code_updates(updates: &str) -> String {
    let body = escape_html(updates).replace('\n', "<br>");
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
      <h1 style="color: #ff0000; text-align: center;">{CODE_UPDATES_SUBJECT}</h1>
      <p>Here are your latest code updates:</p>
      <div style="background-color: #f4f4f4; padding: 15px; border-radius: 5px; font-family: monospace; white-space: pre;">
        {body}
      </div>
      <p style="margin-top: 20px; text-align: center; color: #777;">
        This is an automated message from GameTube.
      </p>
    </div>
  "#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
