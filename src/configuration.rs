use std::path::Path;
use std::sync::Arc;
use std::{env, time};

use anyhow::Context;
use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use url::Url;

use crate::email_client::{MailTransport, Mailbox, PostmarkClient, SmtpClient};

/// Settings
#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub contact: ContactSettings,
    pub email_client: EmailClientSettings,
}

impl Settings {
    /// Get settings from configuration files and the environment
    pub fn get_config() -> Result<Self, ConfigError> {
        let path = env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        let config_dir = path.join("config");

        // Detect the running environment (default: `dev`)
        let env: Env = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "dev".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        Self::load(
            &config_dir,
            &env,
            env::var("PORT").ok(),
            env::var("CONTACT_EMAIL").ok(),
        )
    }

    /// Read the configuration from files and environment variables
    ///
    /// `port` and `admin_email` take precedence over everything else unless empty.
    fn load(
        config_dir: &Path,
        env: &Env,
        port: Option<String>,
        admin_email: Option<String>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            // Base configuration file
            .add_source(File::from(config_dir.join("base.yaml")).required(true))
            // Environment-specific configuration file
            .add_source(File::from(config_dir.join(format!("{}.yaml", env.as_str()))).required(true))
            // Environment variables (e.g., `PORTFOLIO__CONTACT__ADMIN_EMAIL=me@example.com`
            // would set Settings.contact.admin_email to me@example.com)
            .add_source(Environment::with_prefix("PORTFOLIO").separator("__"))
            // Plain variables understood by the previous Node deployment
            .set_override_option("application.port", port.filter(|v| !v.is_empty()))?
            .set_override_option(
                "contact.admin_email",
                admin_email.filter(|v| !v.is_empty()),
            )?
            .build()?
            .try_deserialize()
    }
}

/// Application settings
#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// CORS origins allowed to post the contact form, any origin when empty
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Contact relay settings
#[derive(Clone, serde::Deserialize)]
pub struct ContactSettings {
    pub admin_email: String,
}

impl ContactSettings {
    /// Mailbox receiving owner notifications and sending acknowledgments
    pub fn admin_mailbox(&self) -> Mailbox {
        Mailbox::new(self.admin_email.clone())
    }
}

/// Supported mail transports
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Smtp,
    Postmark,
}

/// Email client settings
#[derive(Clone, serde::Deserialize)]
pub struct EmailClientSettings {
    pub transport: TransportKind,
    pub smtp: Option<SmtpSettings>,
    pub postmark: Option<PostmarkSettings>,
}

impl EmailClientSettings {
    /// Build the selected mail transport
    pub fn client(&self) -> anyhow::Result<Arc<dyn MailTransport>> {
        match self.transport {
            TransportKind::Smtp => {
                let settings = self
                    .smtp
                    .as_ref()
                    .context("`email_client.smtp` is required for the smtp transport")?;
                Ok(Arc::new(settings.client()?))
            }
            TransportKind::Postmark => {
                let settings = self
                    .postmark
                    .as_ref()
                    .context("`email_client.postmark` is required for the postmark transport")?;
                Ok(Arc::new(settings.client()?))
            }
        }
    }
}

/// SMTP relay settings
#[derive(Clone, serde::Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when `true`, STARTTLS otherwise
    pub secure: bool,
    #[serde(default)]
    pub username: String,
    pub password: SecretString,
    pub timeout_millis: u64,
}

impl SmtpSettings {
    /// Build the SMTP client
    pub fn client(&self) -> anyhow::Result<SmtpClient> {
        SmtpClient::new(
            &self.host,
            self.port,
            self.secure,
            self.username.clone(),
            &self.password,
            self.timeout(),
        )
    }

    /// Get configured timeout
    pub const fn timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_millis)
    }
}

/// Postmark API settings
#[derive(Clone, serde::Deserialize)]
pub struct PostmarkSettings {
    pub base_url: String,
    pub authorization_token: SecretString,
    pub timeout_millis: u64,
}

impl PostmarkSettings {
    /// Build the Postmark client
    pub fn client(&self) -> anyhow::Result<PostmarkClient> {
        let base_url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Postmark base URL `{}`", self.base_url))?;
        PostmarkClient::new(base_url, self.authorization_token.clone(), self.timeout())
            .context("Failed to build the Postmark HTTP client")
    }

    /// Get configured timeout
    pub const fn timeout(&self) -> time::Duration {
        time::Duration::from_millis(self.timeout_millis)
    }
}

/// Available runtime environments
#[derive(Debug)]
pub enum Env {
    Development,
    Production,
}

impl Env {
    /// Represent environment as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prd",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Self::Development),
            "prd" => Ok(Self::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `dev` or `prd`"
            )),
        }
    }
}
