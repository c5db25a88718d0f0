use std::time;

use anyhow::Context;
use lettre::message::{Mailbox as LettreMailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::Response;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

use crate::email_client::{Email, MailTransport, Mailbox};

/// Web UI of the Ethereal sandbox, where captured messages can be read
const ETHEREAL_WEB: &str = "https://ethereal.email";

/// Email client for an SMTP relay
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Relay is the Ethereal sandbox, whose responses carry a preview id
    ethereal: bool,
}

impl SmtpClient {
    /// Build an SMTP client
    ///
    /// `secure` selects implicit TLS (usually port 465), otherwise STARTTLS is
    /// required (usually port 587). An empty username disables authentication.
    pub fn new(
        host: &str,
        port: u16,
        secure: bool,
        username: String,
        password: &SecretString,
        timeout: time::Duration,
    ) -> anyhow::Result<Self> {
        let builder = if secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .with_context(|| format!("Failed to configure SMTP relay `{host}`"))?
        .port(port)
        .timeout(Some(timeout));

        let builder = if username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                username,
                password.expose_secret().to_owned(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
            ethereal: host.ends_with("ethereal.email"),
        })
    }
}

/// Convert a mailbox into its `lettre` counterpart, validating the address
fn lettre_mailbox(mailbox: &Mailbox) -> anyhow::Result<LettreMailbox> {
    let address: Address = mailbox
        .address
        .parse()
        .with_context(|| format!("`{}` is not a deliverable email address", mailbox.address))?;
    Ok(LettreMailbox::new(mailbox.name.clone(), address))
}

/// Build a multipart/alternative message with plain-text and HTML bodies
fn build_message(email: &Email) -> anyhow::Result<Message> {
    Message::builder()
        .from(lettre_mailbox(&email.from)?)
        .to(lettre_mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .context("Failed to build the email message")
}

/// Text lines of an SMTP response, joined
fn response_text(response: &Response) -> String {
    response.message().collect::<Vec<_>>().join(" ")
}

/// Preview URL of a message captured by Ethereal
///
/// Ethereal ends its `250` reply with `[STATUS=new MSGID=<id>]`.
fn ethereal_preview_url(response: &str) -> Option<String> {
    let (_, status) = response.trim_end().strip_suffix(']')?.rsplit_once('[')?;
    let message_id = status
        .split_whitespace()
        .find_map(|pair| pair.strip_prefix("MSGID="))
        .filter(|id| !id.is_empty())?;
    Some(format!("{ETHEREAL_WEB}/message/{message_id}"))
}

#[async_trait::async_trait]
impl MailTransport for SmtpClient {
    #[tracing::instrument(name = "Sending email through SMTP", skip_all, fields(recipient = %email.to))]
    async fn send_email(&self, email: &Email) -> anyhow::Result<()> {
        let message = build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .context("SMTP relay rejected the email")?;
        let text = response_text(&response);
        tracing::info!(code = %response.code(), response = %text, "Email accepted by SMTP relay");
        if self.ethereal {
            if let Some(preview_url) = ethereal_preview_url(&text) {
                tracing::info!(%preview_url, "Email captured by Ethereal");
            }
        }
        Ok(())
    }
}
