#![cfg(feature = "reqwest")]

// std
use std::sync::{Arc, Mutex};
// crates.io
use httpmock::prelude::*;
// self
use storefront_client::{
	ApiClient, ClientConfig, FailureKind,
	model::{AdminUser, Category, Meta, Role},
	notify::{Notification, NotifyLevel},
	store::{ListResource, ListStore, LoadMode, LoadOutcome},
	transport::ReqwestTransport,
};

const USERS_PAGE: &str = r#"{
	"data": [{
		"id": "u1",
		"name": "Ana",
		"email": "ana@example.com",
		"role": "ADMIN",
		"createdAt": "2025-01-02T03:04:05Z",
		"updatedAt": "2025-01-03T03:04:05Z"
	}],
	"meta": { "page": 2, "limit": 10, "total": 11, "totalPages": 2 }
}"#;

fn build_client(server: &MockServer) -> ApiClient<ReqwestTransport> {
	let config =
		ClientConfig::new(server.base_url()).expect("Mock server base URL should be accepted.");

	ApiClient::new(config).expect("Client transport should build.")
}

fn recording_store<T>(
	resource: ListResource,
) -> (ListStore<T>, Arc<Mutex<Vec<Notification>>>)
where
	T: 'static + Clone + Send + Sync + serde::de::DeserializeOwned,
{
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = {
		let seen = Arc::clone(&seen);

		move |notification: Notification| {
			seen.lock().expect("Notification log lock should not be poisoned.").push(notification)
		}
	};

	(ListStore::with_notifier(resource, Arc::new(sink)), seen)
}

#[tokio::test]
async fn users_store_loads_the_selected_page_once() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users")
				.query_param("page", "2")
				.query_param("limit", "10")
				.query_param("search", "ana");
			then.status(200).header("content-type", "application/json").body(USERS_PAGE);
		})
		.await;
	let client = build_client(&server);
	let (store, notifications) = recording_store::<AdminUser>(ListResource::users());
	let loading_seen = Arc::new(Mutex::new(Vec::new()));

	{
		let loading_seen = Arc::clone(&loading_seen);

		store.subscribe(move |state| {
			loading_seen.lock().expect("Listener log lock should not be poisoned.").push(state.loading)
		});
	}

	store.set_page(2);
	store.set_search("ana");

	assert_eq!(store.load(&client, LoadMode::IfStale).await, LoadOutcome::Loaded);
	assert_eq!(store.load(&client, LoadMode::IfStale).await, LoadOutcome::Skipped);

	mock.assert_calls_async(1).await;

	let state = store.snapshot();

	assert_eq!(state.list.len(), 1);
	assert_eq!(state.list[0].role, Role::Admin);
	assert_eq!(state.meta, Some(Meta { page: 2, limit: 10, total: 11, total_pages: 2 }));
	assert!(state.loaded_once);
	assert!(!state.loading);
	assert!(notifications.lock().expect("Notification log lock should not be poisoned.").is_empty());
	assert_eq!(
		*loading_seen.lock().expect("Listener log lock should not be poisoned."),
		vec![false, false, true, false]
	);

	assert_eq!(store.load(&client, LoadMode::Force).await, LoadOutcome::Loaded);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn failed_loads_notify_and_keep_previous_state() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/orders");
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"message":"Falha ao listar pedidos"}"#);
		})
		.await;
	let client = build_client(&server);
	let (store, notifications) =
		recording_store::<storefront_client::model::Order>(ListResource::orders());
	let outcome = store.load(&client, LoadMode::IfStale).await;

	mock.assert_async().await;

	let LoadOutcome::Failed(failure) = outcome else {
		panic!("A 500 response should fail the load.");
	};

	assert_eq!(failure.kind, FailureKind::Status);

	let state = store.snapshot();

	assert!(!state.loading);
	assert!(!state.loaded_once);
	assert!(state.list.is_empty());
	assert_eq!(
		*notifications.lock().expect("Notification log lock should not be poisoned."),
		vec![Notification::new("Falha ao listar pedidos", NotifyLevel::Error)]
	);
}

#[tokio::test]
async fn categories_load_as_a_bare_array() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/categories").query_param_missing("page");
			then.status(200).body(r#"[{"id":"c1","name":"Áudio"},{"id":"c2","name":"Games"}]"#);
		})
		.await;
	let client = build_client(&server);
	let (store, _) = recording_store::<Category>(ListResource::categories());

	assert_eq!(store.load(&client, LoadMode::Force).await, LoadOutcome::Loaded);

	mock.assert_async().await;

	let state = store.snapshot();

	assert_eq!(state.list.iter().map(|category| category.name.as_str()).collect::<Vec<_>>(), [
		"Áudio", "Games"
	]);
	assert_eq!(state.meta, None);
}
