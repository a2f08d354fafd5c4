//! SMTP delivery for contact-form submissions using lettre.
//!
//! One encrypted SMTP session is opened per submission, authenticates,
//! sends the single message, and closes.

use async_trait::async_trait;
use core_config::{env_optional, env_or_default, ConfigError, FromEnv};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info};

use crate::error::{ContactError, ContactResult};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;

/// Outbound-mail configuration.
///
/// Credentials are optional at load time; their absence is reported per
/// field when a submission actually tries to send, not at startup.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub receiver_email: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            sender_email: None,
            sender_password: None,
            receiver_email: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

impl FromEnv for MailerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = env_or_default("SMTP_PORT", &DEFAULT_SMTP_PORT.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "SMTP_PORT".to_string(),
                details: format!("{e}"),
            })?;

        Ok(Self {
            sender_email: env_optional("SENDER_EMAIL"),
            sender_password: env_optional("SENDER_PASSWORD"),
            receiver_email: env_optional("RECEIVER_EMAIL"),
            smtp_host: env_or_default("SMTP_HOST", DEFAULT_SMTP_HOST),
            smtp_port,
        })
    }
}

/// Delivery seam for contact submissions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactMailer: Send + Sync {
    /// Deliver one plain-text message to the configured receiver
    async fn send(&self, subject: &str, body: &str) -> ContactResult<()>;
}

/// SMTP implementation of [`ContactMailer`]
pub struct SmtpMailer {
    config: MailerConfig,
}

impl SmtpMailer {
    pub fn new(config: MailerConfig) -> Self {
        Self { config }
    }

    fn parse_mailbox(address: &str) -> ContactResult<Mailbox> {
        address.parse().map_err(|e| {
            error!(error = %e, "Invalid mail address in configuration");
            ContactError::Delivery
        })
    }
}

#[async_trait]
impl ContactMailer for SmtpMailer {
    async fn send(&self, subject: &str, body: &str) -> ContactResult<()> {
        // Each credential is checked before any delivery is attempted,
        // with a per-field message the storefront shows verbatim.
        let sender = self.config.sender_email.as_deref().ok_or_else(|| {
            ContactError::Config("El email del remitente no está configurado".to_string())
        })?;
        let password = self.config.sender_password.as_deref().ok_or_else(|| {
            ContactError::Config("La contraseña del remitente no está configurada".to_string())
        })?;
        let receiver = self.config.receiver_email.as_deref().ok_or_else(|| {
            ContactError::Config("El email del receptor no está configurado".to_string())
        })?;

        let message = Message::builder()
            .from(Self::parse_mailbox(sender)?)
            .to(Self::parse_mailbox(receiver)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| {
                error!(error = %e, "Failed to build mail message");
                ContactError::Delivery
            })?;

        // One TLS session per submission
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| {
                error!(error = %e, host = %self.config.smtp_host, "Failed to create SMTP relay");
                ContactError::Delivery
            })?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        transport.send(message).await.map_err(|e| {
            error!(error = %e, "Failed to send contact mail");
            ContactError::Delivery
        })?;

        info!(subject = %subject, "Contact mail sent");
        Ok(())
    }
}
