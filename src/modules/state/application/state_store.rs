use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::modules::state::domain::{
    FilterAction, FilterChange, FilterType, Listener, ListenerId, StoreEvent, StoreEventKind,
    StoreEventPayload,
};
use crate::modules::study::{Study, StudyNormalizer, ViewMode};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

/// Coarse data state for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// Nothing installed yet and no load running
    NotLoaded,
    Loading,
    /// `last_error` is set
    Error,
    /// A collection was installed and it is empty
    Empty,
    Ready,
}

struct StoreState {
    studies: Arc<Vec<Study>>,
    loaded: bool,
    generation: u64,
    category_filters: BTreeSet<String>,
    subject_filters: BTreeSet<String>,
    search_query: String,
    view_mode: ViewMode,
    loading: bool,
    last_error: Option<AppError>,
    listeners: HashMap<StoreEventKind, Vec<(ListenerId, Listener)>>,
    next_listener_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            studies: Arc::new(Vec::new()),
            loaded: false,
            generation: 0,
            category_filters: BTreeSet::new(),
            subject_filters: BTreeSet::new(),
            search_query: String::new(),
            view_mode: ViewMode::default(),
            loading: false,
            last_error: None,
            listeners: HashMap::new(),
            next_listener_id: 1,
        }
    }
}

/// Everything a query needs, read under one lock
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub studies: Arc<Vec<Study>>,
    pub search_query: String,
    pub category_filters: BTreeSet<String>,
    pub subject_filters: BTreeSet<String>,
}

type StoreGuard<'a> = ReentrantMutexGuard<'a, RefCell<StoreState>>;

/// Single source of truth for the catalog session.
///
/// Each mutation and the dispatch of its events run under one reentrant
/// gate: other threads wait until the dispatch is over, while listeners
/// running on the dispatching thread may read from or write to the store.
/// Getters hand out copies; the canonical collection is only ever replaced
/// wholesale through `set_studies`.
pub struct StateStore {
    inner: ReentrantMutex<RefCell<StoreState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(StoreState::default())),
        }
    }

    // ---------------------------------------------------------------
    // Collection
    // ---------------------------------------------------------------

    /// Replace the canonical collection.
    ///
    /// The store takes ownership of `studies`, so nothing outside keeps a
    /// handle into the new collection. A study that breaks the categories
    /// invariant rejects the whole batch: `last_error` is set, `error` is
    /// emitted and the previous collection stays in place.
    ///
    /// Returns whether the collection was replaced.
    pub fn set_studies(&self, studies: Vec<Study>) -> bool {
        let guard = self.inner.lock();

        if let Err(err) = Validator::validate_studies(&studies) {
            self.reject(&guard, err);
            return false;
        }

        let snapshot = Arc::new(studies);
        {
            let mut state = guard.borrow_mut();
            state.studies = snapshot.clone();
            state.loaded = true;
            state.generation += 1;
            state.last_error = None;
        }
        info!("Installed {} studies", snapshot.len());

        self.dispatch(
            &guard,
            vec![
                StoreEventPayload::StudiesLoaded { studies: snapshot },
                StoreEventPayload::StateChanged,
            ],
        );
        true
    }

    /// Replace the collection from untrusted data.
    ///
    /// Anything but a JSON array is a `ValidationError`; array elements go
    /// through the normalizer first.
    pub fn set_studies_from_value(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => self.set_studies(StudyNormalizer::normalize(items)),
            other => {
                let guard = self.inner.lock();
                self.reject(
                    &guard,
                    AppError::ValidationError(format!(
                        "setStudies expects an array, got {}",
                        json_type_name(other)
                    )),
                );
                false
            }
        }
    }

    /// Apply a result computed against `generation` only if no newer
    /// collection was installed in the meantime (last writer wins).
    pub fn set_studies_if_current(&self, generation: u64, studies: Vec<Study>) -> bool {
        let _guard = self.inner.lock();
        let current = self.generation();
        if current != generation {
            info!(
                "Discarding superseded study collection (generation {} < {})",
                generation, current
            );
            return false;
        }
        self.set_studies(studies)
    }

    /// Deep copy of the canonical collection
    pub fn get_studies(&self) -> Vec<Study> {
        self.read(|state| state.studies.as_ref().clone())
    }

    /// Shared read-only view of the canonical collection
    pub fn studies_snapshot(&self) -> Arc<Vec<Study>> {
        self.read(|state| state.studies.clone())
    }

    pub fn study_count(&self) -> usize {
        self.read(|state| state.studies.len())
    }

    /// Bumped by every successful `set_studies`
    pub fn generation(&self) -> u64 {
        self.read(|state| state.generation)
    }

    pub fn is_loaded(&self) -> bool {
        self.read(|state| state.loaded)
    }

    // ---------------------------------------------------------------
    // Search and filters
    // ---------------------------------------------------------------

    pub fn set_search_query(&self, query: &str) {
        let guard = self.inner.lock();
        let query = query.trim().to_string();
        guard.borrow_mut().search_query = query.clone();

        self.dispatch(
            &guard,
            vec![
                StoreEventPayload::FilterChanged(FilterChange::new(
                    FilterType::Search,
                    FilterAction::Set,
                    query,
                )),
                StoreEventPayload::StateChanged,
            ],
        );
    }

    pub fn get_search_query(&self) -> String {
        self.read(|state| state.search_query.clone())
    }

    pub fn add_category_filter(&self, category: &str) -> bool {
        self.update_filter(FilterType::Category, FilterAction::Add, category)
    }

    pub fn remove_category_filter(&self, category: &str) -> bool {
        self.update_filter(FilterType::Category, FilterAction::Remove, category)
    }

    pub fn get_category_filters(&self) -> BTreeSet<String> {
        self.read(|state| state.category_filters.clone())
    }

    pub fn add_subject_filter(&self, subject: &str) -> bool {
        self.update_filter(FilterType::Subject, FilterAction::Add, subject)
    }

    pub fn remove_subject_filter(&self, subject: &str) -> bool {
        self.update_filter(FilterType::Subject, FilterAction::Remove, subject)
    }

    pub fn get_subject_filters(&self) -> BTreeSet<String> {
        self.read(|state| state.subject_filters.clone())
    }

    /// Reset category filters, subject filters and the query in one step
    pub fn clear_filters(&self) {
        let guard = self.inner.lock();
        {
            let mut state = guard.borrow_mut();
            state.category_filters.clear();
            state.subject_filters.clear();
            state.search_query.clear();
        }

        self.dispatch(
            &guard,
            vec![
                StoreEventPayload::FilterChanged(FilterChange::clear_all()),
                StoreEventPayload::StateChanged,
            ],
        );
    }

    /// Idempotent set update; emits only when membership actually changed
    fn update_filter(&self, filter_type: FilterType, action: FilterAction, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            debug!("Ignoring empty {:?} filter value", filter_type);
            return false;
        }

        let guard = self.inner.lock();
        let changed = {
            let mut state = guard.borrow_mut();
            let set = match filter_type {
                FilterType::Subject => &mut state.subject_filters,
                _ => &mut state.category_filters,
            };
            match action {
                FilterAction::Remove => set.remove(value),
                _ => set.insert(value.to_string()),
            }
        };

        if changed {
            self.dispatch(
                &guard,
                vec![
                    StoreEventPayload::FilterChanged(FilterChange::new(
                        filter_type,
                        action,
                        value,
                    )),
                    StoreEventPayload::StateChanged,
                ],
            );
        }
        changed
    }

    /// Collection, query and filters as of one instant
    pub fn query_snapshot(&self) -> QuerySnapshot {
        self.read(|state| QuerySnapshot {
            studies: state.studies.clone(),
            search_query: state.search_query.clone(),
            category_filters: state.category_filters.clone(),
            subject_filters: state.subject_filters.clone(),
        })
    }

    // ---------------------------------------------------------------
    // View mode, loading and errors
    // ---------------------------------------------------------------

    /// Accepts `card` or `list`; anything else is coerced to `card`
    pub fn set_view_mode(&self, mode: &str) {
        let mode = mode.parse::<ViewMode>().unwrap_or_else(|_| {
            warn!("Invalid view mode '{}', falling back to 'card'", mode);
            ViewMode::Card
        });

        let guard = self.inner.lock();
        let previous = guard.borrow().view_mode;
        if previous == mode {
            return;
        }
        guard.borrow_mut().view_mode = mode;

        self.dispatch(
            &guard,
            vec![
                StoreEventPayload::ViewModeChanged {
                    previous,
                    current: mode,
                },
                StoreEventPayload::StateChanged,
            ],
        );
    }

    pub fn get_view_mode(&self) -> ViewMode {
        self.read(|state| state.view_mode)
    }

    pub fn set_loading(&self, loading: bool) {
        let guard = self.inner.lock();
        if guard.borrow().loading == loading {
            return;
        }
        guard.borrow_mut().loading = loading;
        self.dispatch(&guard, vec![StoreEventPayload::StateChanged]);
    }

    pub fn is_loading(&self) -> bool {
        self.read(|state| state.loading)
    }

    /// Record a failure that the view should surface
    pub fn record_error(&self, error: AppError) {
        let guard = self.inner.lock();
        guard.borrow_mut().last_error = Some(error.clone());
        self.dispatch(
            &guard,
            vec![
                StoreEventPayload::Error(error),
                StoreEventPayload::StateChanged,
            ],
        );
    }

    pub fn last_error(&self) -> Option<AppError> {
        self.read(|state| state.last_error.clone())
    }

    pub fn data_status(&self) -> DataStatus {
        self.read(|state| {
            if state.last_error.is_some() {
                DataStatus::Error
            } else if state.loading {
                DataStatus::Loading
            } else if !state.loaded {
                DataStatus::NotLoaded
            } else if state.studies.is_empty() {
                DataStatus::Empty
            } else {
                DataStatus::Ready
            }
        })
    }

    // ---------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------

    pub fn add_event_listener<F>(&self, kind: StoreEventKind, callback: F) -> ListenerId
    where
        F: Fn(&StoreEvent) -> AppResult<()> + Send + Sync + 'static,
    {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id += 1;
        state
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    pub fn remove_event_listener(&self, kind: StoreEventKind, id: ListenerId) -> bool {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        match state.listeners.get_mut(&kind) {
            Some(listeners) => {
                let before = listeners.len();
                listeners.retain(|(existing, _)| *existing != id);
                listeners.len() != before
            }
            None => false,
        }
    }

    pub fn listener_count(&self, kind: StoreEventKind) -> usize {
        self.read(|state| state.listeners.get(&kind).map_or(0, Vec::len))
    }

    /// Detach every listener
    pub fn teardown(&self) {
        let guard = self.inner.lock();
        guard.borrow_mut().listeners.clear();
        debug!("State store listeners detached");
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let guard = self.inner.lock();
        let state = guard.borrow();
        f(&state)
    }

    fn reject(&self, guard: &StoreGuard<'_>, error: AppError) {
        warn!("Rejected study collection: {}", error);
        guard.borrow_mut().last_error = Some(error.clone());
        self.dispatch(guard, vec![StoreEventPayload::Error(error)]);
    }

    /// Notify subscribers in registration order.
    ///
    /// Callbacks run against a snapshot of the listener list with no
    /// `RefCell` borrow outstanding. A callback that errors or panics is
    /// logged and the next one still runs.
    fn dispatch(&self, guard: &StoreGuard<'_>, payloads: Vec<StoreEventPayload>) {
        for payload in payloads {
            let event = StoreEvent::new(payload);
            let kind = event.kind();
            let listeners: Vec<(ListenerId, Listener)> = guard
                .borrow()
                .listeners
                .get(&kind)
                .cloned()
                .unwrap_or_default();

            for (id, listener) in listeners {
                match catch_unwind(AssertUnwindSafe(|| listener(&event))) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        error!("Listener {:?} for '{}' failed: {}", id, kind, err);
                    }
                    Err(panic) => {
                        error!(
                            "Listener {:?} for '{}' panicked: {}",
                            id,
                            kind,
                            panic_message(&*panic)
                        );
                    }
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
