//! Client configuration, per-call overrides, and process-wide defaults.
//!
//! The explicit [`ClientConfig`] struct is the source of truth for resolution
//! defaults; [`ResolveOptions`] overrides it per call. The mutable process-wide
//! default block is a documented convenience layered on top—clients built without a
//! pinned config consult it at call time, so late changes apply to later calls.

// self
use crate::_prelude::*;

/// Asset API server consumed when neither options nor configuration override it.
pub const DEFAULT_SERVER_URL: &str = "https://api.assetgrid.dev";

static PROCESS_DEFAULTS: LazyLock<RwLock<ClientConfig>> =
	LazyLock::new(|| RwLock::new(ClientConfig::default()));

/// Explicit resolution defaults; call-site options override these values.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Asset API server consumed when a resolve call omits `server_url`.
	pub server_url: Url,
	/// Access token attached to endpoint fetches when a call omits one.
	pub access_token: Option<String>,
}
impl ClientConfig {
	/// Creates a configuration for the provided server with no default token.
	pub fn new(server_url: Url) -> Self {
		Self { server_url, access_token: None }
	}

	/// Sets or replaces the default access token.
	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());

		self
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		let server_url =
			Url::parse(DEFAULT_SERVER_URL).expect("DEFAULT_SERVER_URL must be a valid URL.");

		Self { server_url, access_token: None }
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("server_url", &self.server_url.as_str())
			.field("access_token_set", &self.access_token.is_some())
			.finish()
	}
}

/// Returns a snapshot of the process-wide default configuration.
pub fn process_defaults() -> ClientConfig {
	PROCESS_DEFAULTS.read().clone()
}

/// Replaces the process-wide default access token.
///
/// Passing `None` stops attaching an `access_token` query parameter to endpoint
/// fetches that do not supply their own token.
pub fn set_default_access_token(token: Option<String>) {
	PROCESS_DEFAULTS.write().access_token = token;
}

/// Replaces the process-wide default asset API server.
pub fn set_default_server_url(server_url: Url) {
	PROCESS_DEFAULTS.write().server_url = server_url;
}

/// Per-call overrides for asset resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
	/// Access token override for this call.
	pub access_token: Option<String>,
	/// Asset API server override for this call.
	pub server_url: Option<Url>,
}
impl ResolveOptions {
	/// Creates empty options; configuration defaults apply to every field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the access token for this call.
	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());

		self
	}

	/// Overrides the asset API server for this call.
	pub fn with_server_url(mut self, server_url: Url) -> Self {
		self.server_url = Some(server_url);

		self
	}
}
