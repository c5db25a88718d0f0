use std::sync::Arc;

use anyhow::Context;

use crate::domain::ContactSubmission;
use crate::email_client::{Email, MailTransport, Mailbox};
use crate::templates::{
    EmailTemplates, ACKNOWLEDGMENT_HTML, ACKNOWLEDGMENT_TEXT, OWNER_NOTIFICATION_HTML,
    OWNER_NOTIFICATION_TEXT,
};

/// Subject of the acknowledgment sent back to the submitter
pub const ACKNOWLEDGMENT_SUBJECT: &str = "Votre demande a bien été reçue";

/// Relays contact submissions to the site owner and acknowledges them to the sender
pub struct ContactRelay {
    transport: Arc<dyn MailTransport>,
    admin_email: Mailbox,
    templates: EmailTemplates,
}

impl ContactRelay {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        admin_email: Mailbox,
        templates: EmailTemplates,
    ) -> Self {
        Self {
            transport,
            admin_email,
            templates,
        }
    }

    /// Notification sent to the site owner, on behalf of the submitter
    pub fn owner_notification(&self, submission: &ContactSubmission) -> anyhow::Result<Email> {
        Ok(Email {
            from: Mailbox::with_name(submission.name.as_ref(), submission.email.as_ref()),
            to: self.admin_email.clone(),
            subject: format!(
                "Nouvelle demande de contact de {}",
                submission.name.as_ref()
            ),
            html_body: self
                .templates
                .render(OWNER_NOTIFICATION_HTML, submission)
                .context("Failed to render the owner notification HTML body")?,
            text_body: self
                .templates
                .render(OWNER_NOTIFICATION_TEXT, submission)
                .context("Failed to render the owner notification text body")?,
        })
    }

    /// Acknowledgment sent back to the submitter
    pub fn sender_acknowledgment(&self, submission: &ContactSubmission) -> anyhow::Result<Email> {
        Ok(Email {
            from: self.admin_email.clone(),
            to: Mailbox::new(submission.email.as_ref()),
            subject: ACKNOWLEDGMENT_SUBJECT.to_string(),
            html_body: self
                .templates
                .render(ACKNOWLEDGMENT_HTML, submission)
                .context("Failed to render the acknowledgment HTML body")?,
            text_body: self
                .templates
                .render(ACKNOWLEDGMENT_TEXT, submission)
                .context("Failed to render the acknowledgment text body")?,
        })
    }

    /// Send the owner notification, then the acknowledgment
    ///
    /// Both emails are built before anything is sent, so a submission is either
    /// fully attempted or not attempted at all. The acknowledgment is skipped when
    /// the owner notification fails.
    #[tracing::instrument(
        name = "Relaying contact submission",
        skip_all,
        fields(
            sender_name = %submission.name.as_ref(),
            sender_email = %submission.email.as_ref()
        )
    )]
    pub async fn relay(&self, submission: &ContactSubmission) -> anyhow::Result<()> {
        let notification = self.owner_notification(submission)?;
        let acknowledgment = self.sender_acknowledgment(submission)?;

        self.transport
            .send_email(&notification)
            .await
            .with_context(|| format!("Failed to notify {}", self.admin_email))?;
        tracing::info!("Owner notification sent");

        self.transport
            .send_email(&acknowledgment)
            .await
            .with_context(|| format!("Failed to acknowledge {}", acknowledgment.to))?;
        tracing::info!("Sender acknowledgment sent");

        Ok(())
    }
}
