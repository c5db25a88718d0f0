use std::fmt;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::contact_relay::ContactRelay;
use crate::domain::ContactSubmission;
use crate::utils::error_chain_fmt;

/// Contact form JSON body
///
/// Fields are optional so that absent and `null` values reach validation instead of
/// failing deserialization.
#[derive(serde::Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl TryFrom<ContactForm> for ContactSubmission {
    type Error = String;

    fn try_from(value: ContactForm) -> Result<Self, Self::Error> {
        Self::parse(value.name, value.email, value.message)
    }
}

/// Contact endpoint JSON response
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ContactResponse {
    pub const fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub const fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// Contact error type
///
/// The `Display` output is what callers see, causes are only logged.
#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Missing fields")]
    MissingFields(String),
    #[error("Invalid payload")]
    InvalidPayload(#[source] JsonPayloadError),
    #[error("Erreur lors de l'envoi du mail")]
    RelayFailed(#[from] anyhow::Error),
}

impl fmt::Debug for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)?;
        if let Self::MissingFields(reason) = self {
            writeln!(f, "Caused by:\n\t{reason}")?;
        }
        Ok(())
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::RelayFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ContactResponse::failure(self.to_string()))
    }
}

/// Turn JSON extraction failures into the contact error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ContactError::InvalidPayload(err).into()
}

/// Contact form handler
#[tracing::instrument(
    name = "Handling a contact submission",
    skip(form, relay),
    fields(sender_email = tracing::field::Empty, sender_name = tracing::field::Empty)
)]
pub async fn contact(
    form: web::Json<ContactForm>,
    relay: web::Data<ContactRelay>,
) -> Result<HttpResponse, ContactError> {
    // Validate the submission before any email is built
    let submission: ContactSubmission =
        form.into_inner().try_into().map_err(ContactError::MissingFields)?;
    tracing::Span::current()
        .record("sender_email", tracing::field::display(submission.email.as_ref()))
        .record("sender_name", tracing::field::display(submission.name.as_ref()));

    // Relay the submission, reporting any failure as a single error
    if let Err(e) = relay.relay(&submission).await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to relay contact submission"
        );
        return Err(ContactError::RelayFailed(e));
    }

    Ok(HttpResponse::Ok().json(ContactResponse::success()))
}
