use crate::{MailError, MailResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
	pub subject: String,
	pub body: String,
	pub from_email: String,
	pub to: Vec<String>,
}

impl EmailMessage {
	/// Build a message, rejecting header injection in the subject and
	/// malformed addresses.
	pub fn new(
		subject: impl Into<String>,
		body: impl Into<String>,
		from_email: impl Into<String>,
		to: Vec<String>,
	) -> MailResult<Self> {
		let subject: String = subject.into();
		let from_email: String = from_email.into();
		if subject.contains(['\r', '\n']) {
			return Err(MailError::InvalidAddress(format!(
				"subject contains a line break: {:?}",
				subject
			)));
		}
		for address in std::iter::once(&from_email).chain(to.iter()) {
			validate_address(address)?;
		}
		Ok(Self {
			subject,
			body: body.into(),
			from_email,
			to,
		})
	}
}

/// Accepts `local@domain` and `Name <local@domain>`.
fn validate_address(address: &str) -> MailResult<()> {
	let bare = match (address.find('<'), address.rfind('>')) {
		(Some(start), Some(end)) if start < end => &address[start + 1..end],
		_ => address,
	};
	let valid = !bare.contains(['\r', '\n', ' '])
		&& bare
			.split_once('@')
			.is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
	if valid {
		Ok(())
	} else {
		Err(MailError::InvalidAddress(address.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("ops@example.com", true)]
	#[case("Ops Team <ops@example.com>", true)]
	#[case("ops", false)]
	#[case("@example.com", false)]
	#[case("ops@example.com\r\nBcc: x@y", false)]
	fn test_validate_address(#[case] address: &str, #[case] valid: bool) {
		assert_eq!(validate_address(address).is_ok(), valid);
	}

	#[test]
	fn test_subject_with_newline_is_rejected() {
		let result = EmailMessage::new("a\nb", "", "root@localhost", vec![]);
		assert!(matches!(result, Err(MailError::InvalidAddress(_))));
	}
}
