//! User authentication hooked into the request phase.

use async_trait::async_trait;
use kairo_exception::{Error, Result};
use kairo_http::Request;
use kairo_middleware::{HookSet, Middleware, MiddlewareOutcome};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context;

/// The user a request was made by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
	pub id: Option<String>,
	pub username: String,
}

impl AuthUser {
	pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			username: username.into(),
		}
	}

	pub fn anonymous() -> Self {
		Self {
			id: None,
			username: String::new(),
		}
	}

	pub fn is_anonymous(&self) -> bool {
		self.id.is_none()
	}
}

/// Looks up the user of a request.
#[async_trait]
pub trait AuthBackend: Send + Sync {
	/// `Ok(None)` when the request carries no valid credentials.
	async fn get_user(&self, request: &Request) -> Result<Option<AuthUser>>;
}

/// Builds an [`AuthBackend`] by name.
pub type AuthBackendFactory = Arc<dyn Fn() -> anyhow::Result<Arc<dyn AuthBackend>> + Send + Sync>;

/// Named [`AuthBackend`] factories selected by `auth_user_backend`.
#[derive(Clone, Default)]
pub struct AuthBackendRegistry {
	factories: HashMap<String, AuthBackendFactory>,
}

impl AuthBackendRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
	where
		F: Fn() -> anyhow::Result<Arc<dyn AuthBackend>> + Send + Sync + 'static,
	{
		self.factories.insert(name.into(), Arc::new(factory));
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Construct the backend registered as `name`.
	///
	/// # Errors
	///
	/// [`Error::ImproperlyConfigured`] when nothing is registered under
	/// `name` or construction fails.
	pub fn instantiate(&self, name: &str) -> Result<Arc<dyn AuthBackend>> {
		let factory = self.factories.get(name).ok_or_else(|| {
			Error::ImproperlyConfigured(format!("Failed to import {}: \"not registered\".", name))
		})?;
		factory().map_err(|err| {
			Error::ImproperlyConfigured(format!("Failed to import {}: \"{}\".", name, err))
		})
	}
}

impl fmt::Debug for AuthBackendRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&String> = self.factories.keys().collect();
		names.sort();
		f.debug_struct("AuthBackendRegistry")
			.field("backends", &names)
			.finish()
	}
}

/// Attaches the request's [`AuthUser`] to its extensions.
///
/// Unauthenticated requests get [`AuthUser::anonymous`]. The backend is
/// the one the application resolved from `auth_user_backend`.
#[derive(Debug, Default)]
pub struct AuthenticationMiddleware;

impl AuthenticationMiddleware {
	pub const IDENTIFIER: &'static str = "kairo.auth.middleware.AuthenticationMiddleware";
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
	fn hooks(&self) -> HookSet {
		HookSet::NONE.request()
	}

	async fn process_request(&self, request: &mut Request) -> Result<MiddlewareOutcome> {
		let backend = context::current()
			.and_then(|context| context.auth_backend().cloned())
			.ok_or_else(|| {
				Error::ImproperlyConfigured(
					"AuthenticationMiddleware requires an auth_user_backend".to_string(),
				)
			})?;
		let user = backend
			.get_user(request)
			.await?
			.unwrap_or_else(AuthUser::anonymous);
		request.extensions_mut().insert(user);
		Ok(MiddlewareOutcome::Continue)
	}
}

/// The user attached by [`AuthenticationMiddleware`], if it ran.
pub fn request_user(request: &Request) -> Option<&AuthUser> {
	request.extensions().get::<AuthUser>()
}
