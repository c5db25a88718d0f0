use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, ADMIN_EMAIL};

fn alice() -> serde_json::Value {
    json!({"name": "Alice", "email": "alice@example.com", "message": "Hello"})
}

#[tokio::test]
async fn contact_returns_a_200_for_a_valid_submission() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&alice()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn contact_notifies_the_owner_before_acknowledging_the_sender() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    app.post_contact(&alice())
        .await
        .error_for_status()
        .unwrap();

    assert_eq!(
        app.email_recipients().await,
        vec![ADMIN_EMAIL, "alice@example.com"]
    );

    let requests = app.email_server.received_requests().await.unwrap();
    let notification: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(notification["From"], "Alice <alice@example.com>");
    assert_eq!(
        notification["Subject"],
        "Nouvelle demande de contact de Alice"
    );
    let acknowledgment: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(acknowledgment["From"], ADMIN_EMAIL);
    assert!(acknowledgment["TextBody"]
        .as_str()
        .unwrap()
        .contains("Hello"));
}

#[tokio::test]
async fn contact_returns_a_400_when_fields_are_missing_or_empty() {
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (json!({"email": "alice@example.com", "message": "Hello"}), "missing the name"),
        (json!({"name": "Alice", "message": "Hello"}), "missing the email"),
        (json!({"name": "Alice", "email": "alice@example.com"}), "missing the message"),
        (
            json!({"name": "Alice", "email": "alice@example.com", "message": ""}),
            "an empty message",
        ),
        (json!({}), "missing every field"),
    ];

    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for (body, description) in test_cases {
        let response = app.post_contact(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {description}"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({"success": false, "error": "Missing fields"}));
    }
}

#[tokio::test]
async fn contact_returns_a_400_for_a_malformed_body() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .api_client
        .post(format!("{}/api/contact", &app.address))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn contact_returns_a_500_when_the_owner_notification_fails() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(body_partial_json(json!({"To": ADMIN_EMAIL})))
        .respond_with(ResponseTemplate::new(500).set_body_string("smtp relay exploded"))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/email"))
        .and(body_partial_json(json!({"To": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&alice()).await;

    assert_eq!(500, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(!body.contains("exploded"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"success": false, "error": "Erreur lors de l'envoi du mail"})
    );
}

#[tokio::test]
async fn contact_returns_a_500_when_the_acknowledgment_fails() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(body_partial_json(json!({"To": ADMIN_EMAIL})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/email"))
        .and(body_partial_json(json!({"To": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&alice()).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Erreur lors de l'envoi du mail");
}

#[tokio::test]
async fn contact_answers_cors_preflight_requests() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/contact", &app.address),
        )
        .header("Origin", "https://portfolio.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
