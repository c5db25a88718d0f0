use std::sync::{Arc, LazyLock};
use std::{env, io, time};

use secrecy::SecretString;
use wiremock::MockServer;

use portfolio::configuration::Settings;
use portfolio::email_client::PostmarkClient;
use portfolio::startup::Application;
use portfolio::telemetry::{get_subscriber, init_subscriber};

/// Ensure the tracing stack is initialized only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber(
            subscriber_name,
            default_filter_level,
            io::stdout,
        ));
    } else {
        init_subscriber(get_subscriber(
            subscriber_name,
            default_filter_level,
            io::sink,
        ));
    };
});

/// Administrator address configured for every test application
pub const ADMIN_EMAIL: &str = "owner@example.com";

/// Test application data
pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spin up a test application and return its data
    pub async fn spawn() -> Self {
        // Initialize logging
        LazyLock::force(&TRACING);

        // Launch a mock server to stand in for Postmark's API
        let email_server = MockServer::start().await;

        // Get settings and modify them for testing
        let config = {
            let mut c = Settings::get_config().expect("Failed to read configuration");
            // Listen on a random TCP port
            c.application.host = "127.0.0.1".into();
            c.application.port = 0;
            c.contact.admin_email = ADMIN_EMAIL.into();
            c
        };

        // Use the mock server as email API
        let transport = PostmarkClient::new(
            email_server.uri().parse().expect("Invalid mock server URL"),
            SecretString::from("test-token".to_string()),
            time::Duration::from_millis(200),
        )
        .expect("Failed to build email client");

        // Build the application and get its address
        let app = Application::build_with_transport(config, Arc::new(transport))
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        // Run the application and return its data
        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run_until_stopped());
        Self {
            address,
            email_server,
            api_client: reqwest::Client::new(),
        }
    }

    /// Perform a POST request to the contact endpoint
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Recipients of the emails received by the mock Postmark API, in order
    pub async fn email_recipients(&self) -> Vec<String> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["To"].as_str().unwrap().to_owned()
            })
            .collect()
    }
}
