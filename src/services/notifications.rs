//! Client notifications for lifecycle transitions. Delivery is
//! best-effort: sends run on a detached task and failures are logged,
//! never propagated into the transition that triggered them.

use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::NotificationsConfig,
    error::{AppError, AppResult},
    models::{Appointment, Client},
};

/// Lifecycle events the client hears about
#[derive(Debug, Clone, Copy)]
pub enum AppointmentEvent {
    Confirmed,
    Cancelled,
    NoShow,
}

#[derive(Clone)]
pub struct NotificationsService {
    config: NotificationsConfig,
}

impl NotificationsService {
    pub fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }

    /// Queue a notification without blocking the caller
    pub fn dispatch(&self, event: AppointmentEvent, appointment: &Appointment, client: &Client) {
        let Some(to) = client.email.clone() else {
            tracing::debug!(client_id = %client.id, "client has no email, skipping notification");
            return;
        };

        let service = self.clone();
        let client_name = client.name.clone();
        let appointment = appointment.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send(event, &appointment, &client_name, &to).await {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    error = %e,
                    "failed to send appointment notification"
                );
            }
        });
    }

    async fn send(
        &self,
        event: AppointmentEvent,
        appointment: &Appointment,
        client_name: &str,
        to: &str,
    ) -> AppResult<()> {
        let (subject, body) = match event {
            AppointmentEvent::Confirmed => (
                "Your appointment is confirmed",
                format!(
                    r#"
Hi {name},

Your appointment on {date} at {time} is confirmed.
Confirmation code: {code}

See you soon!
"#,
                    name = client_name,
                    date = appointment.date,
                    time = appointment.start_time.format("%H:%M"),
                    code = appointment.confirmation_code,
                ),
            ),
            AppointmentEvent::Cancelled => (
                "Your appointment was cancelled",
                format!(
                    r#"
Hi {name},

Your appointment on {date} at {time} has been cancelled.
If this wasn't you, get in touch with the salon to rebook.
"#,
                    name = client_name,
                    date = appointment.date,
                    time = appointment.start_time.format("%H:%M"),
                ),
            ),
            AppointmentEvent::NoShow => (
                "We missed you",
                format!(
                    r#"
Hi {name},

You missed your appointment on {date} at {time}.
Future bookings may require a deposit.
"#,
                    name = client_name,
                    date = appointment.date,
                    time = appointment.start_time.format("%H:%M"),
                ),
            ),
        };

        self.send_email(to, subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Navalha");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mut builder = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::Internal(format!("SMTP relay error: {}", e)))?
            .port(self.config.smtp_port);

        if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let mailer = builder.build();
        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
