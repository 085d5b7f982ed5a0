//! Asset endpoint descriptors and the re-resolvable metadata sub-resource.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResolutionError},
	http::JsonFetch,
};

/// Query-parameter name carrying the bearer credential on the wire.
pub(crate) const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Immutable descriptor returned by the asset API for a single asset.
///
/// A token renewal produces a new descriptor value; existing descriptors are never
/// mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEndpoint {
	/// Location of the actual asset payload.
	pub url: String,
	/// Wire type tag driving imagery provider dispatch.
	#[serde(rename = "type")]
	pub asset_type: String,
	/// Short-lived bearer credential for the asset, when the API issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<String>,
}

/// Metadata sub-resource used for the initial resolution and for every later token
/// renewal against the same asset.
///
/// The sub-resource keeps whatever server and credentials it was originally
/// configured with, so a renewal re-fetches exactly the same endpoint document.
#[derive(Clone)]
pub struct EndpointResource {
	url: Url,
	query: BTreeMap<String, String>,
	transport: Arc<dyn JsonFetch>,
}
impl EndpointResource {
	/// Builds the `{server}/v1/assets/{id}/endpoint` sub-resource, attaching an
	/// `access_token` query parameter iff a token is supplied.
	pub fn new(
		asset_id: u64,
		server_url: &Url,
		access_token: Option<&str>,
		transport: Arc<dyn JsonFetch>,
	) -> Result<Self, ConfigError> {
		let raw = format!(
			"{}/v1/assets/{asset_id}/endpoint",
			server_url.as_str().trim_end_matches('/')
		);
		let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidServerUrl { source })?;
		let mut query = BTreeMap::new();

		if let Some(token) = access_token {
			query.insert(ACCESS_TOKEN_PARAM.into(), token.into());
		}

		Ok(Self { url, query, transport })
	}

	/// Endpoint URL without query parameters.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Query parameters attached to every metadata fetch.
	pub fn query_parameters(&self) -> &BTreeMap<String, String> {
		&self.query
	}

	/// Endpoint URL with the query parameters applied.
	pub fn request_url(&self) -> Url {
		with_query(&self.url, &self.query)
	}

	/// Fetches and decodes the endpoint descriptor.
	///
	/// No retry happens here; transport failures, non-success statuses, and malformed
	/// bodies propagate unchanged to the caller.
	pub async fn resolve(&self) -> Result<AssetEndpoint, ResolutionError> {
		let response = self.transport.fetch(self.request_url()).await?;

		if !(200..300).contains(&response.status) {
			return Err(ResolutionError::Status { status: response.status });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ResolutionError::Parse { source })
	}
}
impl Debug for EndpointResource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EndpointResource")
			.field("url", &self.url.as_str())
			.field("access_token_set", &self.query.contains_key(ACCESS_TOKEN_PARAM))
			.finish()
	}
}

/// Applies a query-parameter map onto a URL, keeping any query already present.
pub(crate) fn with_query(url: &Url, query: &BTreeMap<String, String>) -> Url {
	let mut out = url.clone();

	if !query.is_empty() {
		out.query_pairs_mut().extend_pairs(query.iter());
	}

	out
}
