//! Minimal per-request session storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Key/value session data attached to a request by a session middleware.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
	data: HashMap<String, Value>,
	#[serde(skip)]
	modified: bool,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.data.insert(key.into(), value.into());
		self.modified = true;
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		let removed = self.data.remove(key);
		if removed.is_some() {
			self.modified = true;
		}
		removed
	}

	pub fn is_modified(&self) -> bool {
		self.modified
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}
