use std::time;

use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::email_client::{Email, MailTransport};

/// Email client for Postmark's REST API
pub struct PostmarkClient {
    http_client: Client,
    base_url: Url,
    authorization_token: SecretString,
}

/// Postmark send request body
#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: String,
    to: String,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

/// Postmark send response body (only the fields we log)
#[derive(serde::Deserialize)]
struct SendEmailResponse {
    #[serde(rename = "MessageID")]
    message_id: Option<String>,
}

impl PostmarkClient {
    pub fn new(
        base_url: Url,
        authorization_token: SecretString,
        timeout: time::Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            base_url,
            authorization_token,
        })
    }
}

#[async_trait::async_trait]
impl MailTransport for PostmarkClient {
    /// Send an email using Postmark's REST API
    /// <https://postmarkapp.com/developer/user-guide/send-email-with-api>
    #[tracing::instrument(name = "Sending email through Postmark", skip_all, fields(recipient = %email.to))]
    async fn send_email(&self, email: &Email) -> anyhow::Result<()> {
        let url = self
            .base_url
            .join("/email")
            .context("Failed to build the Postmark endpoint URL")?;
        let request_body = SendEmailRequest {
            from: email.from.to_string(),
            to: email.to.to_string(),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
        };

        let response = self
            .http_client
            .post(url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .context("Failed to reach the Postmark API")?
            .error_for_status()
            .context("Postmark rejected the email")?;

        // The message id is informational only, a missing or odd body is not an error
        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id);
        tracing::info!(message_id = ?message_id, "Email accepted by Postmark");

        Ok(())
    }
}
