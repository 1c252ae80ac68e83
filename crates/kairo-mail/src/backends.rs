//! Delivery backends.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{EmailMessage, MailResult};

#[async_trait]
pub trait EmailBackend: Send + Sync {
	/// Deliver `messages`, returning how many were sent.
	async fn send_messages(&self, messages: &[EmailMessage]) -> MailResult<usize>;
}

/// Writes every message to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

#[async_trait]
impl EmailBackend for ConsoleBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> MailResult<usize> {
		for message in messages {
			tracing::info!(
				from = %message.from_email,
				to = %message.to.join(", "),
				subject = %message.subject,
				"\n{}",
				message.body
			);
		}
		Ok(messages.len())
	}
}

/// Keeps sent messages in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn outbox(&self) -> Vec<EmailMessage> {
		self.outbox.lock().clone()
	}

	pub fn clear(&self) {
		self.outbox.lock().clear();
	}
}

#[async_trait]
impl EmailBackend for MemoryBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> MailResult<usize> {
		self.outbox.lock().extend_from_slice(messages);
		Ok(messages.len())
	}
}
