use std::sync::Arc;
use std::{io, net};

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::contact_relay::ContactRelay;
use crate::email_client::MailTransport;
use crate::routes::{contact, json_error_handler};
use crate::templates::EmailTemplates;

/// Application
pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    /// Build an application based on settings
    ///
    /// Must be called from within a Tokio runtime, the SMTP transport spawns its
    /// connection pool on it.
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        let transport = config
            .email_client
            .client()
            .context("Failed to build the mail transport")?;
        Self::build_with_transport(config, transport)
    }

    /// Build an application based on settings and an already built mail transport
    pub fn build_with_transport(
        config: Settings,
        transport: Arc<dyn MailTransport>,
    ) -> anyhow::Result<Self> {
        // Build the contact relay
        let templates = EmailTemplates::new().context("Failed to load email templates")?;
        let relay = ContactRelay::new(transport, config.contact.admin_mailbox(), templates);

        // Run the HTTP server and return its data
        let listener = net::TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))?;
        let port = listener.local_addr()?.port();
        let server = run_server(listener, relay, config.application.allowed_origins)?;
        Ok(Self { server, port })
    }

    /// Get application port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run application until it is stopped
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server.await
    }
}

/// Run the HTTP server
pub fn run_server(
    listener: net::TcpListener,
    relay: ContactRelay,
    allowed_origins: Vec<String>,
) -> io::Result<Server> {
    // Prepare data to be added the application context
    let relay = web::Data::new(relay);

    // Start the HTTP server
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .route("/api/contact", web::post().to(contact))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(relay.clone())
    })
    .listen(listener)?
    .run())
}

/// CORS policy for the static front end
fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
