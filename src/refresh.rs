//! Credential renewal coordination: retry classification, single-flight renewal, and
//! token fan-out across cloned resources.
//!
//! Every resource cloned from one resolution shares a single pending-renewal slot.
//! The first credential-related failure starts a renewal by re-resolving the stored
//! endpoint sub-resource; concurrent failures await the same shared future instead of
//! issuing their own requests. The shared future writes the fresh token into the root
//! query map and clears the slot exactly once before any awaiter resumes; each awaiter
//! then fixes up its own private query map.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use futures::{FutureExt, future::Shared};
// self
use crate::{
	_prelude::*,
	endpoint::ACCESS_TOKEN_PARAM,
	obs::{self, OpKind, OpOutcome, OpSpan},
	resource::{AssetResource, QueryHandle, SharedAssetState},
};

/// Output of the shared renewal future: the renewed token, when the API issued one.
pub(crate) type RefreshOutcome = Result<Option<String>, Arc<Error>>;
/// Shared single-flight renewal future awaited by every concurrent failure.
pub(crate) type PendingRefresh = Shared<Pin<Box<dyn Future<Output = RefreshOutcome> + Send>>>;

/// Failure descriptor handed to the retry hook by the transport collaborator.
///
/// Image-style loads cannot surface an HTTP status, so callers flag them explicitly
/// instead of the broker inferring anything from a media type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestFailure {
	/// HTTP status code, when the failing request surfaced one.
	pub status: Option<u16>,
	/// True when the failure came from an image-style load.
	pub image_load: bool,
}
impl RequestFailure {
	/// Failure carrying an HTTP status code.
	pub fn with_status(status: u16) -> Self {
		Self { status: Some(status), image_load: false }
	}

	/// Image-style load failure; those never carry a status code.
	pub fn image_load() -> Self {
		Self { status: None, image_load: true }
	}
}

/// Renewal is warranted only for presumptively credential-related failures: an
/// explicit 401, or an image-style load that cannot carry a status.
pub(crate) fn should_renew(failure: Option<&RequestFailure>) -> bool {
	match failure {
		Some(failure) => failure.status == Some(401) || failure.image_load,
		None => false,
	}
}

impl AssetResource {
	/// Retry hook invoked by the transport collaborator after a failed request.
	///
	/// Returns `Ok(true)` once the shared token renewal has settled and this
	/// instance's own query parameters carry the fresh token; the caller should then
	/// retry the original request exactly once. `Ok(false)` means the failure is not
	/// credential-related and must surface unchanged. `Err` means the renewal itself
	/// failed; callers treat that as do-not-retry and surface the original failure.
	pub async fn retry_after_failure(&self, failure: Option<&RequestFailure>) -> Result<bool> {
		if !should_renew(failure) {
			return Ok(false);
		}

		const KIND: OpKind = OpKind::Refresh;

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let shared = self.shared();

		shared.metrics.record_attempt();

		match pending_or_started(shared).await {
			Ok(token) => {
				// The shared future already fixed up the root; this instance owns its
				// own query map and must be fixed up separately.
				apply_token(self.query_handle(), token.as_deref());
				shared.metrics.record_success();
				obs::record_op_outcome(KIND, OpOutcome::Success);

				Ok(true)
			},
			Err(source) => {
				shared.metrics.record_failure();
				obs::record_op_outcome(KIND, OpOutcome::Failure);

				Err(Error::Refresh { source })
			},
		}
	}
}

/// Returns the in-flight renewal for the shared block, starting one if none exists.
fn pending_or_started(shared: &Arc<SharedAssetState>) -> PendingRefresh {
	let mut slot = shared.pending.lock();

	if let Some(pending) = slot.as_ref() {
		return pending.clone();
	}

	let pending = start_renewal(shared.clone());

	*slot = Some(pending.clone());

	pending
}

/// Builds the shared renewal future.
///
/// The slot is emptied inside the future—pass or fail—so clearing happens exactly
/// once, strictly after settlement begins and strictly before any awaiter resumes.
/// The next failure after that starts a fresh renewal instead of reusing a settled one.
fn start_renewal(shared: Arc<SharedAssetState>) -> PendingRefresh {
	let span = OpSpan::new(OpKind::Refresh, "renew_access_token");
	let renewal = async move {
		let outcome = match shared.endpoint_resource.resolve().await {
			Ok(endpoint) => {
				let token = endpoint.access_token.clone();

				// The root resource is the single source of truth for the most
				// recent token; all other instances fix themselves up on resume.
				apply_token(&shared.root_query, token.as_deref());

				*shared.endpoint.write() = endpoint;

				Ok(token)
			},
			Err(err) => Err(Arc::new(Error::from(err))),
		};

		*shared.pending.lock() = None;

		outcome
	};
	let renewal: Pin<Box<dyn Future<Output = RefreshOutcome> + Send>> =
		Box::pin(span.instrument(renewal));

	renewal.shared()
}

/// Writes (or removes) the access token on one instance's query map.
fn apply_token(query: &QueryHandle, token: Option<&str>) {
	let mut map = query.lock();

	match token {
		Some(token) => {
			map.insert(ACCESS_TOKEN_PARAM.into(), token.into());
		},
		None => {
			map.remove(ACCESS_TOKEN_PARAM);
		},
	}
}

/// Thread-safe counters for renewal attempts.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the total number of renewal attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of renewals observed as successful (shared settlements count
	/// once per awaiting resource).
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of renewals observed as failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
