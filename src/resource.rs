//! Resolved asset resources and the ancestry state shared across clones.

// self
use crate::{
	_prelude::*,
	endpoint::{self, ACCESS_TOKEN_PARAM, AssetEndpoint, EndpointResource},
	error::ResolutionError,
	refresh::{PendingRefresh, RefreshMetrics},
};

/// Query-parameter map owned by a single resource instance.
pub type QueryMap = BTreeMap<String, String>;

/// Shared handle to one instance's query parameters.
///
/// The root instance and the shared state block alias the same handle, which is how
/// a renewed token lands on the root without reaching into a foreign instance.
pub(crate) type QueryHandle = Arc<Mutex<QueryMap>>;

/// State shared by every resource cloned from a common resolution.
///
/// Mutated only by the refresh coordinator; per-instance query maps stay private to
/// their owning instance.
pub(crate) struct SharedAssetState {
	/// Last-known endpoint descriptor; replaced wholesale on renewal.
	pub(crate) endpoint: RwLock<AssetEndpoint>,
	/// Sub-resource used to re-resolve the endpoint with its original credentials.
	pub(crate) endpoint_resource: EndpointResource,
	/// Single-flight slot; at most one outstanding renewal per shared block.
	pub(crate) pending: Mutex<Option<PendingRefresh>>,
	/// Query parameters of the root resource, the source of truth for the newest token.
	pub(crate) root_query: QueryHandle,
	/// Renewal counters shared with the client that produced this chain.
	pub(crate) metrics: Arc<RefreshMetrics>,
}

/// A fetchable resource backed by a resolved asset.
///
/// Cloning yields an independent instance with its own query-parameter map but a
/// shared reference to the ancestry state, so a token renewal triggered through any
/// clone benefits the whole chain.
pub struct AssetResource {
	url: Url,
	query: QueryHandle,
	retry_budget: u32,
	shared: Arc<SharedAssetState>,
}
impl AssetResource {
	/// Builds the root resource for a freshly resolved endpoint.
	///
	/// The descriptor's token (when present) is injected as an `access_token` query
	/// parameter, and the instance is granted a single automatic retry attempt wired
	/// to [`AssetResource::retry_after_failure`].
	pub fn create(endpoint: AssetEndpoint, endpoint_resource: EndpointResource) -> Result<Self> {
		Self::with_refresh_metrics(endpoint, endpoint_resource, Arc::default())
	}

	pub(crate) fn with_refresh_metrics(
		endpoint: AssetEndpoint,
		endpoint_resource: EndpointResource,
		metrics: Arc<RefreshMetrics>,
	) -> Result<Self> {
		let url = Url::parse(&endpoint.url)
			.map_err(|source| ResolutionError::AssetUrl { source })?;
		let mut query = QueryMap::new();

		if let Some(token) = &endpoint.access_token {
			query.insert(ACCESS_TOKEN_PARAM.into(), token.clone());
		}

		let query = Arc::new(Mutex::new(query));
		let shared = Arc::new(SharedAssetState {
			endpoint: RwLock::new(endpoint),
			endpoint_resource,
			pending: Mutex::new(None),
			root_query: query.clone(),
			metrics,
		});

		Ok(Self { url, query, retry_budget: 1, shared })
	}

	/// Base URL without query parameters.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// URL with this instance's current query parameters applied.
	pub fn request_url(&self) -> Url {
		endpoint::with_query(&self.url, &self.query.lock())
	}

	/// Snapshot of this instance's query parameters.
	pub fn query_parameters(&self) -> QueryMap {
		self.query.lock().clone()
	}

	/// Sets a query parameter on this instance only; clones are unaffected.
	pub fn set_query_parameter(&self, name: impl Into<String>, value: impl Into<String>) {
		self.query.lock().insert(name.into(), value.into());
	}

	/// Last-known endpoint descriptor for this resolution chain.
	pub fn endpoint(&self) -> AssetEndpoint {
		self.shared.endpoint.read().clone()
	}

	/// Automatic retry attempts the transport collaborator may spend on this instance.
	pub fn retry_budget(&self) -> u32 {
		self.retry_budget
	}

	/// True when both resources descend from the same resolution.
	pub fn shares_ancestry_with(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.shared, &other.shared)
	}

	/// True when this instance is the root of its resolution chain.
	pub fn is_root(&self) -> bool {
		Arc::ptr_eq(&self.query, &self.shared.root_query)
	}

	pub(crate) fn shared(&self) -> &Arc<SharedAssetState> {
		&self.shared
	}

	pub(crate) fn query_handle(&self) -> &QueryHandle {
		&self.query
	}
}
impl Clone for AssetResource {
	// Clones alias the ancestry state; query parameters are copied, never shared.
	fn clone(&self) -> Self {
		Self {
			url: self.url.clone(),
			query: Arc::new(Mutex::new(self.query.lock().clone())),
			retry_budget: self.retry_budget,
			shared: self.shared.clone(),
		}
	}
}
impl Debug for AssetResource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssetResource")
			.field("url", &self.url.as_str())
			.field("is_root", &self.is_root())
			.field("access_token_set", &self.query.lock().contains_key(ACCESS_TOKEN_PARAM))
			.finish()
	}
}
