#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
// self
use storefront_client::{
	ClientConfig, QueryValue,
	server::{NO_STATUS, ServerApi},
};

#[derive(Debug, PartialEq, Deserialize)]
struct Profile {
	name: String,
}

fn build_server_api(base_url: &str) -> ServerApi<storefront_client::transport::ReqwestTransport> {
	let config = ClientConfig::new(base_url).expect("Server API base URL should be accepted.");

	ServerApi::new(config).expect("Server API transport should build.")
}

#[tokio::test]
async fn incoming_cookie_is_forwarded_verbatim() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/me")
				.header("cookie", "session=abc; theme=dark")
				.header("content-type", "application/json");
			then.status(200).header("content-type", "application/json").body(r#"{"name":"Ana"}"#);
		})
		.await;
	let api = build_server_api(&server.base_url());
	let response = api.get::<Profile>("/users/me", Some("session=abc; theme=dark"), &[]).await;

	mock.assert_async().await;

	assert!(response.is_ok());
	assert_eq!(response.status, 200);
	assert_eq!(response.data, Some(Profile { name: "Ana".into() }));
}

#[tokio::test]
async fn error_statuses_are_reported_without_data() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/orders").query_param("page", "1").query_param_missing("search");
			then.status(403).body(r#"{"message":"Proibido"}"#);
		})
		.await;
	let api = build_server_api(&server.base_url());
	let params = [("page".to_owned(), QueryValue::from(1)), ("search".to_owned(), QueryValue::Null)];
	let response = api.get::<serde_json::Value>("/orders", None, &params).await;

	mock.assert_async().await;

	assert!(!response.is_ok());
	assert_eq!(response.status, 403);
	assert_eq!(response.data, None);
}

#[tokio::test]
async fn undecodable_bodies_report_no_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users/me");
			then.status(200).body("<html>login</html>");
		})
		.await;
	let api = build_server_api(&server.base_url());
	let response = api.get::<Profile>("/users/me", None, &[]).await;

	mock.assert_async().await;

	assert_eq!(response.status, NO_STATUS);
	assert_eq!(response.data, None);
}

#[tokio::test]
async fn unreachable_api_reports_no_status() {
	let api = build_server_api("http://127.0.0.1:1");
	let response = api.get::<Profile>("/users/me", Some("session=abc"), &[]).await;

	assert_eq!(response.status, NO_STATUS);
	assert_eq!(response.data, None);
	assert!(!response.is_ok());
}
