//! Contact Domain
//!
//! Validates contact-form submissions and delivers each one as a single
//! plain-text email over SMTP. Independent from the catalog vertical;
//! the two share only the HTTP surface.
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_contact::{handlers, mailer::{MailerConfig, SmtpMailer}, service::ContactService};
//!
//! let config = MailerConfig::from_env().unwrap();
//! let service = ContactService::new(SmtpMailer::new(config));
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use error::{ContactError, ContactResult};
pub use mailer::{ContactMailer, MailerConfig, SmtpMailer};
pub use models::{ContactForm, MessageResponse};
pub use service::ContactService;
