//! # Kairo Mail
//!
//! Outgoing notification mail used by the dispatcher to tell site
//! administrators about uncaught failures.
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() {
//! use kairo_mail::{AdminMailer, Mailer, MemoryBackend};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let mailer = AdminMailer::new(
//!     backend.clone(),
//!     vec![("Ops".to_string(), "ops@example.com".to_string())],
//! );
//!
//! mailer.mail_admins("Error 10.0.0.1: /boom", "trace").await.unwrap();
//! assert_eq!(backend.outbox()[0].subject, "[Kairo] Error 10.0.0.1: /boom");
//! # }
//! ```

pub mod backends;
pub mod message;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use backends::{ConsoleBackend, EmailBackend, MemoryBackend};
pub use message::EmailMessage;

#[derive(Debug, Error)]
pub enum MailError {
	#[error("Invalid email address: {0}")]
	InvalidAddress(String),

	#[error("Backend error: {0}")]
	Backend(String),
}

pub type MailResult<T> = std::result::Result<T, MailError>;

/// Sends notifications to the configured administrators.
#[async_trait]
pub trait Mailer: Send + Sync {
	async fn mail_admins(&self, subject: &str, body: &str) -> MailResult<()>;
}

#[async_trait]
impl<T: Mailer + ?Sized> Mailer for Arc<T> {
	async fn mail_admins(&self, subject: &str, body: &str) -> MailResult<()> {
		(**self).mail_admins(subject, body).await
	}
}

pub const DEFAULT_SUBJECT_PREFIX: &str = "[Kairo] ";
pub const DEFAULT_SERVER_EMAIL: &str = "root@localhost";

/// [`Mailer`] sending one message to every `(name, address)` admin.
///
/// With no admins configured nothing is sent.
pub struct AdminMailer {
	backend: Arc<dyn EmailBackend>,
	admins: Vec<(String, String)>,
	server_email: String,
	subject_prefix: String,
}

impl AdminMailer {
	pub fn new(backend: Arc<dyn EmailBackend>, admins: Vec<(String, String)>) -> Self {
		Self {
			backend,
			admins,
			server_email: DEFAULT_SERVER_EMAIL.to_string(),
			subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
		}
	}

	pub fn with_server_email(mut self, address: impl Into<String>) -> Self {
		self.server_email = address.into();
		self
	}

	pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.subject_prefix = prefix.into();
		self
	}

	pub fn admins(&self) -> &[(String, String)] {
		&self.admins
	}
}

#[async_trait]
impl Mailer for AdminMailer {
	async fn mail_admins(&self, subject: &str, body: &str) -> MailResult<()> {
		if self.admins.is_empty() {
			return Ok(());
		}
		let recipients = self
			.admins
			.iter()
			.map(|(name, address)| format!("{} <{}>", name, address))
			.collect();
		let message = EmailMessage::new(
			format!("{}{}", self.subject_prefix, subject),
			body,
			&self.server_email,
			recipients,
		)?;
		self.backend.send_messages(&[message]).await?;
		Ok(())
	}
}
