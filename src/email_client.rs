use std::fmt;

mod postmark;
mod smtp;

pub use postmark::PostmarkClient;
pub use smtp::SmtpClient;

/// Email address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    /// Bare email address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// Email address with a display name
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }
}

/// RFC 5322 `specials` that force a display name to be quoted
const NAME_SPECIALS: [char; 13] = [
    '(', ')', '<', '>', '[', ']', ':', ';', '@', '\\', ',', '.', '"',
];

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if name.contains(NAME_SPECIALS) => {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{escaped}\" <{}>", self.address)
            }
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// Outgoing email with plain-text and HTML variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Capability to deliver an email
///
/// Implementations own their connections and timeouts. A returned error means the
/// email was not accepted for delivery.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_email(&self, email: &Email) -> anyhow::Result<()>;
}
