mod contact_field;
mod contact_submission;

pub use contact_field::ContactField;
pub use contact_submission::ContactSubmission;
