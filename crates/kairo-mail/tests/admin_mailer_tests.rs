use async_trait::async_trait;
use kairo_mail::{
	AdminMailer, ConsoleBackend, EmailBackend, EmailMessage, MailError, MailResult, Mailer,
	MemoryBackend,
};
use rstest::rstest;
use std::sync::Arc;

struct Unreachable;

#[async_trait]
impl EmailBackend for Unreachable {
	async fn send_messages(&self, _messages: &[EmailMessage]) -> MailResult<usize> {
		Err(MailError::Backend("connection refused".into()))
	}
}

#[rstest]
#[tokio::test]
async fn test_one_message_addressed_to_all_admins() {
	let backend = Arc::new(MemoryBackend::new());
	let mailer = AdminMailer::new(
		backend.clone(),
		vec![
			("Ann".to_string(), "ann@example.com".to_string()),
			("Bo".to_string(), "bo@example.com".to_string()),
		],
	)
	.with_subject_prefix("[site] ")
	.with_server_email("errors@example.com");

	mailer.mail_admins("Error 1.2.3.4: /x", "body").await.unwrap();

	let outbox = backend.outbox();
	assert_eq!(outbox.len(), 1);
	assert_eq!(outbox[0].subject, "[site] Error 1.2.3.4: /x");
	assert_eq!(outbox[0].from_email, "errors@example.com");
	assert_eq!(
		outbox[0].to,
		vec!["Ann <ann@example.com>", "Bo <bo@example.com>"]
	);
}

#[rstest]
#[tokio::test]
async fn test_no_admins_sends_nothing() {
	let backend = Arc::new(MemoryBackend::new());
	let mailer = AdminMailer::new(backend.clone(), Vec::new());
	mailer.mail_admins("subject", "body").await.unwrap();
	assert!(backend.outbox().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_backend_failure_is_reported() {
	let mailer = AdminMailer::new(
		Arc::new(Unreachable),
		vec![("Ann".to_string(), "ann@example.com".to_string())],
	);
	let result = mailer.mail_admins("subject", "body").await;
	assert!(matches!(result, Err(MailError::Backend(_))));
}

#[rstest]
#[tokio::test]
async fn test_console_backend_counts_messages() {
	let message =
		EmailMessage::new("hi", "there", "root@localhost", vec!["a@b.c".to_string()]).unwrap();
	let sent = ConsoleBackend
		.send_messages(&[message.clone(), message])
		.await
		.unwrap();
	assert_eq!(sent, 2);
}
