//! Broker-level error types shared across resolution, refresh, and provider dispatch.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Endpoint metadata could not be fetched or decoded.
	#[error(transparent)]
	Resolution(#[from] ResolutionError),
	/// A shared access-token renewal failed; the original request failure should
	/// surface to the caller unchanged.
	#[error("Access token renewal failed.")]
	Refresh {
		/// Failure observed by every caller awaiting the shared renewal.
		#[source]
		source: Arc<Error>,
	},
	/// Provider dispatch received a type tag outside the supported imagery set.
	#[error("Unrecognized imagery asset type: {type_tag}.")]
	UnrecognizedAssetType {
		/// Offending wire tag, exactly as the endpoint reported it.
		type_tag: String,
	},
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Asset API server URL cannot be parsed.
	#[error("Server URL is invalid.")]
	InvalidServerUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failures while fetching or decoding an asset endpoint descriptor.
///
/// The broker never retries these itself; callers of resolution (and the refresh
/// coordinator) see them unchanged.
#[derive(Debug, ThisError)]
pub enum ResolutionError {
	/// Endpoint request failed below HTTP (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Endpoint answered with a non-success status.
	#[error("Asset endpoint returned status {status}.")]
	Status {
		/// HTTP status code reported by the asset API.
		status: u16,
	},
	/// Endpoint body was not a valid descriptor document.
	#[error("Asset endpoint returned a malformed descriptor.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Descriptor carried an asset URL that could not be parsed.
	#[error("Endpoint descriptor contains an invalid asset URL.")]
	AssetUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the asset endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the asset endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
