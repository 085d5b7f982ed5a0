//! Transport primitives for asset endpoint fetches.
//!
//! The module exposes [`JsonFetch`], the broker's only dependency on an HTTP stack.
//! Callers provide an implementation (typically behind `Arc<dyn JsonFetch>`) and the
//! broker performs every metadata fetch—initial resolution and later token
//! renewals—through it. Status classification and JSON decoding stay in the broker so
//! transports only move bytes.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future type returned by [`JsonFetch`] implementations.
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<FetchResponse, TransportError>> + 'a + Send>>;

/// Response surface the broker needs from a transport: final status plus raw body.
#[derive(Clone, Debug)]
pub struct FetchResponse {
	/// HTTP status code of the final response.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}

/// Abstraction over HTTP transports able to fetch JSON documents by URL.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back
/// every resource cloned from a resolution chain. Timeouts and cancellation are the
/// transport's own policy; the broker never imposes one.
pub trait JsonFetch
where
	Self: 'static + Send + Sync,
{
	/// Executes a GET against `url` and yields the final status and body.
	///
	/// Implementations must fail only on transport-level problems; non-success
	/// statuses are returned as ordinary responses for the broker to classify.
	fn fetch(&self, url: Url) -> FetchFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Endpoint fetches follow redirects with reqwest's default policy; configure a
/// custom [`ReqwestClient`] to change that before handing it to the broker.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestJsonClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestJsonClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestJsonClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestJsonClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl JsonFetch for ReqwestJsonClient {
	fn fetch(&self, url: Url) -> FetchFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.get(url).send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(FetchResponse { status, body })
		})
	}
}
