use std::sync::Arc;

use tera::Tera;

use crate::domain::ContactSubmission;

/// Template names and sources; `.html` templates are auto-escaped
const TEMPLATES: &[(&str, &str)] = &[
    (
        OWNER_NOTIFICATION_HTML,
        include_str!("../templates/owner_notification.html"),
    ),
    (
        OWNER_NOTIFICATION_TEXT,
        include_str!("../templates/owner_notification.txt"),
    ),
    (
        ACKNOWLEDGMENT_HTML,
        include_str!("../templates/acknowledgment.html"),
    ),
    (
        ACKNOWLEDGMENT_TEXT,
        include_str!("../templates/acknowledgment.txt"),
    ),
];

pub const OWNER_NOTIFICATION_HTML: &str = "owner_notification.html";
pub const OWNER_NOTIFICATION_TEXT: &str = "owner_notification.txt";
pub const ACKNOWLEDGMENT_HTML: &str = "acknowledgment.html";
pub const ACKNOWLEDGMENT_TEXT: &str = "acknowledgment.txt";

/// Rendering context shared by all contact templates
#[derive(serde::Serialize)]
struct SubmissionContext<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Email body templates
#[derive(Clone)]
pub struct EmailTemplates(Arc<Tera>);

impl EmailTemplates {
    /// Load and compile the bundled templates
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self(Arc::new(tera)))
    }

    /// Render a template for a contact submission
    pub fn render(&self, template: &str, submission: &ContactSubmission) -> tera::Result<String> {
        let context = tera::Context::from_serialize(SubmissionContext {
            name: submission.name.as_ref(),
            email: submission.email.as_ref(),
            message: submission.message.as_ref(),
        })?;
        self.0.render(template, &context)
    }
}
