#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use asset_broker::{
	client::AssetClient,
	config::{ClientConfig, ResolveOptions},
};

const ASSET_ID: u64 = 123890213;

fn server_url(server: &MockServer) -> Url {
	Url::parse(&server.base_url()).expect("Mock server URL should parse.")
}

fn endpoint_body(token: Option<&str>) -> String {
	match token {
		Some(token) => format!(
			"{{\"type\":\"3DTILES\",\"url\":\"https://assets.example/{ASSET_ID}\",\"accessToken\":\"{token}\"}}"
		),
		None =>
			format!("{{\"type\":\"3DTILES\",\"url\":\"https://assets.example/{ASSET_ID}\"}}"),
	}
}

#[tokio::test]
async fn create_resource_fetches_the_endpoint_once_and_builds_the_resource() {
	let server = MockServer::start_async().await;
	let client = AssetClient::new().with_config(ClientConfig::new(server_url(&server)));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/assets/{ASSET_ID}/endpoint"));
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body(Some("tok1")));
		})
		.await;
	let resource = client
		.create_resource(ASSET_ID, &ResolveOptions::new())
		.await
		.expect("Resolution should succeed against the mock endpoint.");

	mock.assert_hits_async(1).await;

	assert_eq!(resource.url().as_str(), format!("https://assets.example/{ASSET_ID}"));
	assert_eq!(
		resource.query_parameters().get("access_token").map(String::as_str),
		Some("tok1"),
	);
	assert_eq!(resource.endpoint().asset_type, "3DTILES");
	assert!(resource.is_root());
}

#[tokio::test]
async fn configured_token_is_attached_to_the_metadata_fetch() {
	let server = MockServer::start_async().await;
	let client = AssetClient::new().with_config(
		ClientConfig::new(server_url(&server)).with_access_token("config-token"),
	);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/v1/assets/{ASSET_ID}/endpoint"))
				.query_param("access_token", "config-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body(None));
		})
		.await;
	let resource = client
		.create_resource(ASSET_ID, &ResolveOptions::new())
		.await
		.expect("Resolution should succeed with the configured token attached.");

	mock.assert_async().await;

	// No descriptor token, so the resource itself carries no access_token parameter.
	assert_eq!(resource.query_parameters().get("access_token"), None);
}

#[tokio::test]
async fn options_override_the_pinned_configuration() {
	let configured = MockServer::start_async().await;
	let overridden = MockServer::start_async().await;
	// The configured server has no mocks; only the per-call override can succeed.
	let client = AssetClient::new().with_config(
		ClientConfig::new(server_url(&configured)).with_access_token("config-token"),
	);
	let mock = overridden
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/v1/assets/{ASSET_ID}/endpoint"))
				.query_param("access_token", "options-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(endpoint_body(Some("tok1")));
		})
		.await;
	let options = ResolveOptions::new()
		.with_server_url(server_url(&overridden))
		.with_access_token("options-token");

	client
		.create_resource(ASSET_ID, &options)
		.await
		.expect("Resolution should hit the per-call server with the per-call token.");

	mock.assert_async().await;
}

#[tokio::test]
async fn resolution_failures_surface_unchanged() {
	let server = MockServer::start_async().await;
	let client = AssetClient::new().with_config(ClientConfig::new(server_url(&server)));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/assets/{ASSET_ID}/endpoint"));
			then.status(401);
		})
		.await;
	let err = client
		.create_resource(ASSET_ID, &ResolveOptions::new())
		.await
		.expect_err("A 401 endpoint answer should fail resolution without retry.");

	// Resolution itself never retries, not even on 401.
	mock.assert_hits_async(1).await;

	assert!(err.to_string().contains("401"));
}
