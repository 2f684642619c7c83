//! Per-view owner of a list [`Query`] and its fetch lifecycle.
//!
//! Every query change issues one fetch tagged with a fresh [`RequestId`].
//! A fetch result is committed only while its id is still the most recently
//! issued one, so the visible state always follows the last mutation no
//! matter in which order responses arrive. Superseded tasks may also be
//! aborted, but correctness only depends on the id comparison.
//!
//! Fetches run as spawned tokio tasks; the controller must be driven from
//! inside a runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};

use crate::controller::table::TableEvent;
use crate::domain::collection::CollectionResult;
use crate::domain::query::{FilterValue, Filters, InitialQuery, Query, Sort};
use crate::domain::types::{PageSize, SortDirection};
use crate::fetcher::{CollectionFetch, FetchError};

pub mod table;

/// Identity of one issued fetch. Later requests compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Settled,
    Failed,
}

/// Terminal outcome of a request, reported once per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    Settled {
        request: RequestId,
        total_count: usize,
    },
    Failed {
        request: RequestId,
        error: FetchError,
    },
    Superseded {
        request: RequestId,
    },
}

#[derive(Clone, Debug)]
pub struct ControllerOptions {
    /// Delay applied to search-text changes before the request goes out.
    pub search_debounce: Option<Duration>,
    /// Abort the task of a superseded request instead of letting it finish.
    pub abort_superseded: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            search_debounce: Some(Duration::from_millis(300)),
            abort_superseded: true,
        }
    }
}

/// Read-only view of the controller state handed to renderers.
#[derive(Clone, Debug)]
pub struct ListSnapshot<T> {
    pub query: Query,
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub phase: FetchPhase,
    pub error: Option<FetchError>,
}

/// Handle to a spawned fetch. Dropping it detaches the task.
#[derive(Debug)]
pub struct PendingFetch {
    request: RequestId,
    handle: JoinHandle<()>,
}

impl PendingFetch {
    pub fn request(&self) -> RequestId {
        self.request
    }

    /// Waits until the request was committed, discarded or aborted.
    pub async fn finished(self) {
        if let Err(err) = self.handle.await {
            if !err.is_cancelled() {
                log::error!("List fetch task {} panicked: {err}", self.request.0);
            }
        }
    }
}

struct InFlight {
    request: RequestId,
    abort: AbortHandle,
}

struct ListState<T> {
    query: Query,
    result: CollectionResult<T>,
    phase: FetchPhase,
    error: Option<FetchError>,
    latest: u64,
    in_flight: Option<InFlight>,
}

struct Shared<F: CollectionFetch> {
    fetcher: F,
    options: ControllerOptions,
    state: Mutex<ListState<F::Record>>,
    events: UnboundedSender<ListEvent>,
}

impl<F: CollectionFetch> Shared<F> {
    fn lock(&self) -> MutexGuard<'_, ListState<F::Record>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ListEvent) {
        if self.events.send(event).is_err() {
            log::debug!("List event receiver dropped");
        }
    }

    fn is_latest(&self, request: RequestId) -> bool {
        self.lock().latest == request.0
    }

    /// Reports a superseded request unless the issuer already did so when
    /// aborting it.
    fn discard(&self, request: RequestId) {
        log::debug!("Discarding superseded list request {}", request.0);
        if !self.options.abort_superseded {
            self.emit(ListEvent::Superseded { request });
        }
    }

    async fn run(self: Arc<Self>, request: RequestId, query: Query, delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
            if !self.is_latest(request) {
                self.discard(request);
                return;
            }
        }

        let outcome = self.fetcher.fetch(&query).await;
        self.commit(request, outcome);
    }

    fn commit(&self, request: RequestId, outcome: Result<CollectionResult<F::Record>, FetchError>) {
        let mut state = self.lock();
        if state.latest != request.0 {
            drop(state);
            self.discard(request);
            return;
        }

        state.in_flight = None;
        match outcome {
            Ok(result) => {
                let total_count = result.total_count;
                state.result = result;
                state.phase = FetchPhase::Settled;
                state.error = None;
                drop(state);
                self.emit(ListEvent::Settled {
                    request,
                    total_count,
                });
            }
            Err(error) => {
                log::error!("Failed to fetch list page: {error}");
                state.phase = FetchPhase::Failed;
                state.error = Some(error.clone());
                drop(state);
                self.emit(ListEvent::Failed { request, error });
            }
        }
    }
}

/// Owns the query, the last committed result and the request lifecycle of
/// one list view. Clones share the same state.
pub struct ListController<F: CollectionFetch> {
    shared: Arc<Shared<F>>,
}

impl<F: CollectionFetch> Clone for ListController<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F: CollectionFetch> ListController<F> {
    /// Creates an idle controller; call [`ListController::load`] to fetch the
    /// first page.
    pub fn new(
        fetcher: F,
        initial: InitialQuery,
        options: ControllerOptions,
    ) -> (Self, UnboundedReceiver<ListEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let state = ListState {
            query: Query::from_initial(initial),
            result: CollectionResult::empty(),
            phase: FetchPhase::Idle,
            error: None,
            latest: 0,
            in_flight: None,
        };
        let controller = Self {
            shared: Arc::new(Shared {
                fetcher,
                options,
                state: Mutex::new(state),
                events,
            }),
        };
        (controller, receiver)
    }

    pub fn snapshot(&self) -> ListSnapshot<F::Record> {
        let state = self.shared.lock();
        ListSnapshot {
            query: state.query.clone(),
            items: state.result.items.clone(),
            total_count: state.result.total_count,
            total_pages: state.result.total_pages(state.query.page_size),
            loading: state.phase == FetchPhase::Loading,
            phase: state.phase,
            error: state.error.clone(),
        }
    }

    pub fn query(&self) -> Query {
        self.shared.lock().query.clone()
    }

    /// Fetches the current query when the view is mounted.
    pub fn load(&self) -> PendingFetch {
        self.refresh()
    }

    /// Re-fetches the current query even though it did not change.
    pub fn refresh(&self) -> PendingFetch {
        let mut state = self.shared.lock();
        self.issue(&mut state, false)
    }

    pub fn set_search(&self, text: impl Into<String>) -> Option<PendingFetch> {
        let text = text.into();
        self.update(true, |q| q.with_search(text))
    }

    pub fn set_filters(&self, filters: Filters) -> Option<PendingFetch> {
        self.update(false, |q| q.with_filters(filters))
    }

    pub fn set_filter(&self, key: impl Into<String>, value: FilterValue) -> Option<PendingFetch> {
        let key = key.into();
        self.update(false, |q| q.with_filter(key, value))
    }

    pub fn clear_filter(&self, key: &str) -> Option<PendingFetch> {
        self.update(false, |q| q.without_filter(key))
    }

    pub fn toggle_filter_value(&self, key: &str, value: &str) -> Option<PendingFetch> {
        self.update(false, |q| q.with_filter_toggled(key, value))
    }

    pub fn set_sort(
        &self,
        key: impl Into<String>,
        direction: SortDirection,
    ) -> Option<PendingFetch> {
        let sort = Sort::new(key, direction);
        self.update(false, |q| q.with_sort(Some(sort)))
    }

    pub fn clear_sort(&self) -> Option<PendingFetch> {
        self.update(false, |q| q.with_sort(None))
    }

    /// Moves to page `page`; values below 1 land on the first page.
    pub fn set_page(&self, page: i64) -> Option<PendingFetch> {
        self.update(false, |q| q.with_page(page))
    }

    /// Moves to a page typed by the user; non-numeric input is ignored.
    pub fn set_page_input(&self, raw: &str) -> Option<PendingFetch> {
        match raw.trim().parse::<i64>() {
            Ok(page) => self.set_page(page),
            Err(_) => {
                log::warn!("Ignoring non-numeric page input {raw:?}");
                None
            }
        }
    }

    /// Switches the page size; unsupported sizes keep the current one.
    pub fn set_page_size(&self, page_size: u32) -> Option<PendingFetch> {
        match PageSize::new(page_size) {
            Ok(page_size) => self.update(false, |q| q.with_page_size(page_size)),
            Err(err) => {
                log::warn!("Ignoring page size change: {err}");
                None
            }
        }
    }

    /// Replaces the visible result without a round trip.
    pub fn replace_result(&self, result: CollectionResult<F::Record>) {
        self.shared.lock().result = result;
    }

    /// Edits the visible result in place without a round trip.
    pub fn patch_result(&self, patch: impl FnOnce(&mut CollectionResult<F::Record>)) {
        patch(&mut self.shared.lock().result);
    }

    /// Optimistically drops rows (e.g. after a delete) and shrinks the total.
    pub fn remove_items(&self, predicate: impl FnMut(&F::Record) -> bool) -> usize {
        self.shared.lock().result.remove_where(predicate)
    }

    /// Applies an event raised by the table renderer.
    pub fn dispatch(&self, event: TableEvent) -> Option<PendingFetch> {
        match event {
            TableEvent::Search(text) => self.set_search(text),
            TableEvent::Filters(filters) => self.set_filters(filters),
            TableEvent::Filter { key, value } => self.set_filter(key, value),
            TableEvent::ClearFilter(key) => self.clear_filter(&key),
            TableEvent::ToggleFilter { key, value } => self.toggle_filter_value(&key, &value),
            TableEvent::Sort { key, direction } => self.set_sort(key, direction),
            TableEvent::ClearSort => self.clear_sort(),
            TableEvent::Page(page) => self.set_page(page),
            TableEvent::PageSize(size) => self.set_page_size(size),
            TableEvent::Refresh => Some(self.refresh()),
        }
    }

    fn update(&self, debounce: bool, next: impl FnOnce(&Query) -> Query) -> Option<PendingFetch> {
        let mut state = self.shared.lock();
        let query = next(&state.query);
        if query == state.query {
            return None;
        }
        state.query = query;
        Some(self.issue(&mut state, debounce))
    }

    fn issue(&self, state: &mut ListState<F::Record>, debounce: bool) -> PendingFetch {
        state.latest += 1;
        let request = RequestId(state.latest);
        state.phase = FetchPhase::Loading;
        state.error = None;

        if let Some(previous) = state.in_flight.take() {
            if self.shared.options.abort_superseded && !previous.abort.is_finished() {
                previous.abort.abort();
                self.shared.emit(ListEvent::Superseded {
                    request: previous.request,
                });
            }
        }

        let delay = if debounce {
            self.shared.options.search_debounce
        } else {
            None
        };
        log::debug!("Issuing list request {} for {:?}", request.0, state.query);

        let shared = Arc::clone(&self.shared);
        let query = state.query.clone();
        let handle = tokio::spawn(shared.run(request, query, delay));
        state.in_flight = Some(InFlight {
            request,
            abort: handle.abort_handle(),
        });

        PendingFetch { request, handle }
    }
}
