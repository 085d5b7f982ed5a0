//! High-level asset client: resolution facade and provider factory composition.

// self
use crate::{
	_prelude::*,
	config::{self, ClientConfig, ResolveOptions},
	endpoint::EndpointResource,
	http::JsonFetch,
	imagery::ImageryProvider,
	obs::{self, OpKind, OpOutcome, OpSpan},
	refresh::RefreshMetrics,
	resource::AssetResource,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestJsonClient;

/// Resolves asset ids against a configured asset API server.
///
/// The client owns the transport handle and the resolution defaults; every resource
/// it produces keeps a reference to the same transport so later token renewals reuse
/// it. Clients built without a pinned configuration consult the process-wide
/// defaults at call time.
#[derive(Clone)]
pub struct AssetClient {
	transport: Arc<dyn JsonFetch>,
	config: Option<ClientConfig>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl AssetClient {
	/// Creates a client around a caller-provided transport.
	pub fn with_transport(transport: impl JsonFetch) -> Self {
		Self { transport: Arc::new(transport), config: None, refresh_metrics: Default::default() }
	}

	/// Creates a client around an already-shared transport handle.
	pub fn with_shared_transport(transport: Arc<dyn JsonFetch>) -> Self {
		Self { transport, config: None, refresh_metrics: Default::default() }
	}

	/// Pins an explicit configuration; process-wide defaults no longer apply.
	pub fn with_config(mut self, config: ClientConfig) -> Self {
		self.config = Some(config);

		self
	}

	/// Shared renewal counters covering every resource this client resolved.
	pub fn refresh_metrics(&self) -> &Arc<RefreshMetrics> {
		&self.refresh_metrics
	}

	/// Resolves an asset id into a fetchable [`AssetResource`].
	///
	/// Issues exactly one metadata fetch against
	/// `{server}/v1/assets/{id}/endpoint`, attaching an `access_token` query
	/// parameter iff the effective configuration carries a token. Resolution
	/// failures propagate unchanged; no retry happens here.
	pub async fn create_resource(
		&self,
		asset_id: u64,
		options: &ResolveOptions,
	) -> Result<AssetResource> {
		const KIND: OpKind = OpKind::Resolve;

		let span = OpSpan::new(KIND, "create_resource");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let effective = self.effective(options);
				let endpoint_resource = EndpointResource::new(
					asset_id,
					&effective.server_url,
					effective.access_token.as_deref(),
					self.transport.clone(),
				)?;
				let endpoint = endpoint_resource.resolve().await?;

				AssetResource::with_refresh_metrics(
					endpoint,
					endpoint_resource,
					self.refresh_metrics.clone(),
				)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Resolves an asset id and dispatches the result into a typed imagery provider.
	///
	/// Equivalent to [`AssetClient::create_resource`] with the same options followed
	/// by factory dispatch on the resolved type tag.
	pub async fn create_imagery_provider(
		&self,
		asset_id: u64,
		options: &ResolveOptions,
	) -> Result<ImageryProvider> {
		let resource = self.create_resource(asset_id, options).await?;

		ImageryProvider::from_resource(resource)
	}

	/// Collapses options, pinned configuration, and process-wide defaults, in that
	/// order of precedence.
	pub(crate) fn effective(&self, options: &ResolveOptions) -> ClientConfig {
		let base = self.config.clone().unwrap_or_else(config::process_defaults);

		ClientConfig {
			server_url: options.server_url.clone().unwrap_or(base.server_url),
			access_token: options.access_token.clone().or(base.access_token),
		}
	}
}
#[cfg(feature = "reqwest")]
impl AssetClient {
	/// Creates a client backed by the crate's default reqwest transport.
	pub fn new() -> Self {
		Self::with_transport(ReqwestJsonClient::default())
	}
}
#[cfg(feature = "reqwest")]
impl Default for AssetClient {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for AssetClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssetClient").field("config", &self.config).finish()
	}
}
