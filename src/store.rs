//! Observable list containers backing the admin back office.
//!
//! A [`ListStore`] holds one list view (users, products, orders, categories) together with its
//! pagination and search inputs and a `loading` flag. [`ListStore::load`] is the only operation
//! that talks to the API; everything else mutates local state and notifies subscribers.
//! Listeners always run after the state lock is released and receive a snapshot.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	client::ApiClient,
	model::{Meta, Paginated},
	notify::{Notifier, TracingNotifier},
	obs::trace_event,
	request::RequestOptions,
	response::{ApiResponse, Failure, Success},
	transport::ApiTransport,
};

/// Page size used by the back office lists.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

type Listener<T> = Arc<dyn Fn(&ListState<T>) + Send + Sync>;

/// Describes the endpoint behind a [`ListStore`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListResource {
	/// Endpoint path, e.g. `/users`.
	pub endpoint: String,
	/// Items per page sent as `limit`.
	pub page_size: u32,
	/// Sends the `search` parameter when true.
	pub searchable: bool,
	/// Expects a `{ data, meta }` body and sends `page`/`limit` when true; a bare array otherwise.
	pub paginated: bool,
}
impl ListResource {
	/// Paginated, non-searchable resource at `endpoint`.
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			page_size: DEFAULT_PAGE_SIZE,
			searchable: false,
			paginated: true,
		}
	}

	/// Enables the `search` parameter.
	pub fn searchable(mut self) -> Self {
		self.searchable = true;

		self
	}

	/// Expects a bare array and sends no pagination parameters.
	pub fn unpaginated(mut self) -> Self {
		self.paginated = false;

		self
	}

	/// Overrides the page size (clamped to at least 1).
	pub fn with_page_size(mut self, page_size: u32) -> Self {
		self.page_size = page_size.max(1);

		self
	}

	/// `/users`, searchable.
	pub fn users() -> Self {
		Self::new("/users").searchable()
	}

	/// `/products`, searchable.
	pub fn products() -> Self {
		Self::new("/products").searchable()
	}

	/// `/orders`.
	pub fn orders() -> Self {
		Self::new("/orders")
	}

	/// `/categories`, a bare array.
	pub fn categories() -> Self {
		Self::new("/categories").unpaginated()
	}
}

/// Snapshot of a list view.
#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
	/// Items of the current page.
	pub list: Vec<T>,
	/// Pagination metadata of the last successful load.
	pub meta: Option<Meta>,
	/// One-based page requested by the next load.
	pub page: u32,
	/// Search term sent by the next load; empty means no filter.
	pub search: String,
	/// True while a load is in flight.
	pub loading: bool,
	/// True once any load succeeded.
	pub loaded_once: bool,
}
impl<T> Default for ListState<T> {
	fn default() -> Self {
		Self {
			list: Vec::new(),
			meta: None,
			page: 1,
			search: String::new(),
			loading: false,
			loaded_once: false,
		}
	}
}

/// Whether [`ListStore::load`] may reuse data that is already loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadMode {
	/// Skip the call when a load already succeeded.
	#[default]
	IfStale,
	/// Always call the API.
	Force,
}

/// Result of [`ListStore::load`].
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
	/// Data was already loaded and no call was made.
	Skipped,
	/// The list was replaced.
	Loaded,
	/// The call failed; the failure was also sent to the notifier.
	Failed(Failure),
}

/// Identifier returned by [`ListStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Observable, paginated list view.
pub struct ListStore<T> {
	resource: ListResource,
	state: RwLock<ListState<T>>,
	listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
	next_listener: AtomicU64,
	notifier: Arc<dyn Notifier>,
}
impl<T> ListStore<T>
where
	T: 'static + Clone + Send + Sync + DeserializeOwned,
{
	/// Creates an empty store that reports failures through [`TracingNotifier`].
	pub fn new(resource: ListResource) -> Self {
		Self::with_notifier(resource, Arc::new(TracingNotifier))
	}

	/// Creates an empty store that reports failures through `notifier`.
	pub fn with_notifier(resource: ListResource, notifier: Arc<dyn Notifier>) -> Self {
		Self {
			resource,
			state: RwLock::new(ListState::default()),
			listeners: Mutex::new(Vec::new()),
			next_listener: AtomicU64::new(0),
			notifier,
		}
	}

	/// Resource this store loads.
	pub fn resource(&self) -> &ListResource {
		&self.resource
	}

	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> ListState<T> {
		self.state.read().clone()
	}

	/// Sets the page used by the next load (clamped to at least 1).
	pub fn set_page(&self, page: u32) {
		self.update(|state| state.page = page.max(1));
	}

	/// Sets the search term used by the next load.
	pub fn set_search(&self, search: impl Into<String>) {
		let search = search.into();

		self.update(|state| state.search = search);
	}

	/// Registers `listener`; it runs after every state change.
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: 'static + Fn(&ListState<T>) + Send + Sync,
	{
		let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));

		self.listeners.lock().push((id, Arc::new(listener)));

		id
	}

	/// Removes a listener; returns `false` when it was not registered.
	pub fn unsubscribe(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();

		listeners.retain(|(registered, _)| *registered != id);

		listeners.len() != before
	}

	/// Loads the current page through `client`.
	///
	/// With [`LoadMode::IfStale`] nothing happens once a load has succeeded. Otherwise the
	/// store flips `loading`, calls the API with the current page and search term, and either
	/// replaces `list`/`meta` or reports the failure through the notifier. Page and search
	/// changes made while the call is in flight are kept.
	pub async fn load<C>(&self, client: &ApiClient<C>, mode: LoadMode) -> LoadOutcome
	where
		C: ?Sized + ApiTransport,
	{
		let (page, search) = {
			let state = self.state.read();

			if mode == LoadMode::IfStale && state.loaded_once {
				return LoadOutcome::Skipped;
			}

			(state.page, state.search.clone())
		};

		self.update(|state| state.loading = true);

		let fetched = if self.resource.paginated {
			let mut options = RequestOptions::new()
				.param("page", page)
				.param("limit", self.resource.page_size);

			if self.resource.searchable {
				options = options.param("search", search);
			}

			client
				.get::<Paginated<T>>(&self.resource.endpoint, options)
				.await
				.map(|page| (page.data, Some(page.meta)))
		} else {
			client
				.get::<Vec<T>>(&self.resource.endpoint, RequestOptions::new())
				.await
				.map(|list| (list, None))
		};

		match fetched {
			ApiResponse::Success(Success { data: Some((list, meta)), .. }) => {
				self.update(|state| {
					state.list = list;
					state.meta = meta;
					state.loading = false;
					state.loaded_once = true;
				});

				LoadOutcome::Loaded
			},
			ApiResponse::Success(Success { status, data: None }) => {
				trace_event!(
					warn,
					endpoint = %self.resource.endpoint,
					status = status.as_u16(),
					"List endpoint returned no body."
				);

				self.fail(Failure::unexpected_body(status))
			},
			ApiResponse::Failure(failure) => self.fail(failure),
		}
	}

	fn fail(&self, failure: Failure) -> LoadOutcome {
		self.update(|state| state.loading = false);
		self.notifier.error(&failure.message);

		LoadOutcome::Failed(failure)
	}

	fn update<F>(&self, mutate: F)
	where
		F: FnOnce(&mut ListState<T>),
	{
		let snapshot = {
			let mut state = self.state.write();

			mutate(&mut state);

			state.clone()
		};
		let listeners =
			self.listeners.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect::<Vec<_>>();

		for listener in listeners {
			listener(&snapshot);
		}
	}
}
impl<T> Debug for ListStore<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ListStore")
			.field("resource", &self.resource)
			.field("state", &*self.state.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::model::Category;

	#[test]
	fn resource_presets_match_back_office_endpoints() {
		assert!(ListResource::users().searchable);
		assert!(ListResource::products().searchable);
		assert!(!ListResource::orders().searchable);
		assert!(!ListResource::categories().paginated);
		assert_eq!(ListResource::orders().with_page_size(0).page_size, 1);
	}

	#[test]
	fn listeners_observe_changes_until_unsubscribed() {
		let store = ListStore::<Category>::new(ListResource::categories());
		let seen = Arc::new(Mutex::new(Vec::new()));
		let id = {
			let seen = Arc::clone(&seen);

			store.subscribe(move |state| seen.lock().push((state.page, state.search.clone())))
		};

		store.set_page(3);
		store.set_search("fone");

		assert!(store.unsubscribe(id));
		assert!(!store.unsubscribe(id));

		store.set_page(0);

		assert_eq!(*seen.lock(), vec![(3, String::new()), (3, "fone".to_owned())]);
		assert_eq!(store.snapshot().page, 1);
	}
}
