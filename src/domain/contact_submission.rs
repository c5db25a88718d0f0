use crate::domain::ContactField;

/// Validated contact form submission
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: ContactField,
    pub email: ContactField,
    pub message: ContactField,
}

impl ContactSubmission {
    /// Parse a contact submission from its raw fields
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<Self, String> {
        Ok(Self {
            name: ContactField::parse("name", name)?,
            email: ContactField::parse("email", email)?,
            message: ContactField::parse("message", message)?,
        })
    }
}
