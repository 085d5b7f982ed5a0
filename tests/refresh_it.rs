#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use asset_broker::{
	client::AssetClient,
	config::{ClientConfig, ResolveOptions},
	error::Error,
	refresh::RequestFailure,
	resource::AssetResource,
};

const ASSET_ID: u64 = 123890213;

fn endpoint_body(token: &str) -> String {
	format!(
		"{{\"type\":\"3DTILES\",\"url\":\"https://assets.example/{ASSET_ID}\",\"accessToken\":\"{token}\"}}"
	)
}

fn token_of(resource: &AssetResource) -> Option<String> {
	resource.query_parameters().get("access_token").cloned()
}

async fn resolve_with_initial_token(server: &MockServer) -> (AssetClient, AssetResource) {
	let server_url = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let client = AssetClient::new().with_config(ClientConfig::new(server_url));
	let mut initial = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/assets/{ASSET_ID}/endpoint"));
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body("tok1"));
		})
		.await;
	let resource = client
		.create_resource(ASSET_ID, &ResolveOptions::new())
		.await
		.expect("Initial resolution should succeed.");

	initial.assert_async().await;
	initial.delete_async().await;

	(client, resource)
}

#[tokio::test]
async fn unauthorized_failure_renews_the_token_for_clone_and_root() {
	let server = MockServer::start_async().await;
	let (client, root) = resolve_with_initial_token(&server).await;
	let renewed = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/assets/{ASSET_ID}/endpoint"));
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body("tok2"));
		})
		.await;
	let clone = root.clone();
	let retry = clone
		.retry_after_failure(Some(&RequestFailure::with_status(401)))
		.await
		.expect("Renewal should succeed against the mock endpoint.");

	renewed.assert_hits_async(1).await;

	assert!(retry);
	assert_eq!(token_of(&clone).as_deref(), Some("tok2"));
	assert_eq!(token_of(&root).as_deref(), Some("tok2"));
	assert_eq!(root.endpoint().access_token.as_deref(), Some("tok2"));
	assert_eq!(client.refresh_metrics().attempts(), 1);
	assert_eq!(client.refresh_metrics().successes(), 1);
}

#[tokio::test]
async fn image_load_failures_also_trigger_renewal() {
	let server = MockServer::start_async().await;
	let (_client, root) = resolve_with_initial_token(&server).await;
	let renewed = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/assets/{ASSET_ID}/endpoint"));
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body("tok2"));
		})
		.await;
	let retry = root
		.retry_after_failure(Some(&RequestFailure::image_load()))
		.await
		.expect("Image-load renewal should succeed against the mock endpoint.");

	renewed.assert_async().await;

	assert!(retry);
	assert_eq!(token_of(&root).as_deref(), Some("tok2"));
}

#[tokio::test]
async fn non_credential_failures_never_contact_the_endpoint() {
	let server = MockServer::start_async().await;
	let (client, root) = resolve_with_initial_token(&server).await;

	let retry = root
		.retry_after_failure(Some(&RequestFailure::with_status(403)))
		.await
		.expect("A 403 should be classified, not errored.");

	assert!(!retry);

	let retry = root.retry_after_failure(None).await.expect("No failure means no retry.");

	assert!(!retry);
	assert_eq!(token_of(&root).as_deref(), Some("tok1"));
	assert_eq!(client.refresh_metrics().attempts(), 0);
}

#[tokio::test]
async fn failed_renewal_propagates_and_keeps_the_old_token() {
	let server = MockServer::start_async().await;
	let (client, root) = resolve_with_initial_token(&server).await;
	// No endpoint mock remains, so the renewal fetch answers 404.
	let err = root
		.retry_after_failure(Some(&RequestFailure::with_status(401)))
		.await
		.expect_err("A failed renewal should propagate as an error.");

	assert!(matches!(err, Error::Refresh { .. }));
	assert_eq!(token_of(&root).as_deref(), Some("tok1"));
	assert_eq!(client.refresh_metrics().failures(), 1);
}
