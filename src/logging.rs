//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
	init_with(DEFAULT_DIRECTIVES)
}

/// [`init`] with a different fallback filter, e.g. `"kairo_dispatch=debug"`.
pub fn init_with(default_directives: &str) -> bool {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directives));

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer())
		.try_init()
		.is_ok()
}
