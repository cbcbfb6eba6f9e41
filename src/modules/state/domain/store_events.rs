//! Events emitted by the state store
//!
//! Every mutation that changes observable state emits a specific event
//! followed by `state-changed`, so a view can either react to the precise
//! change or simply re-render on `state-changed`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::study::{Study, ViewMode};
use crate::shared::errors::{AppError, AppResult};

/// Event names consumers subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreEventKind {
    StudiesLoaded,
    FilterChanged,
    ViewModeChanged,
    Error,
    StateChanged,
}

impl StoreEventKind {
    pub const ALL: [StoreEventKind; 5] = [
        StoreEventKind::StudiesLoaded,
        StoreEventKind::FilterChanged,
        StoreEventKind::ViewModeChanged,
        StoreEventKind::Error,
        StoreEventKind::StateChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreEventKind::StudiesLoaded => "studies-loaded",
            StoreEventKind::FilterChanged => "filter-changed",
            StoreEventKind::ViewModeChanged => "view-mode-changed",
            StoreEventKind::Error => "error",
            StoreEventKind::StateChanged => "state-changed",
        }
    }
}

impl fmt::Display for StoreEventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StoreEventKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown store event '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    Category,
    Subject,
    Search,
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Add,
    Remove,
    Set,
}

/// Payload of `filter-changed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChange {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub action: Option<FilterAction>,
    pub value: Option<String>,
}

impl FilterChange {
    pub fn new(filter_type: FilterType, action: FilterAction, value: impl Into<String>) -> Self {
        Self {
            filter_type,
            action: Some(action),
            value: Some(value.into()),
        }
    }

    pub fn clear_all() -> Self {
        Self {
            filter_type: FilterType::ClearAll,
            action: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreEventPayload {
    /// Read-only snapshot of the collection that was just installed
    StudiesLoaded { studies: Arc<Vec<Study>> },
    FilterChanged(FilterChange),
    ViewModeChanged { previous: ViewMode, current: ViewMode },
    Error(AppError),
    StateChanged,
}

#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payload: StoreEventPayload,
}

impl StoreEvent {
    pub fn new(payload: StoreEventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    pub fn kind(&self) -> StoreEventKind {
        match self.payload {
            StoreEventPayload::StudiesLoaded { .. } => StoreEventKind::StudiesLoaded,
            StoreEventPayload::FilterChanged(_) => StoreEventKind::FilterChanged,
            StoreEventPayload::ViewModeChanged { .. } => StoreEventKind::ViewModeChanged,
            StoreEventPayload::Error(_) => StoreEventKind::Error,
            StoreEventPayload::StateChanged => StoreEventKind::StateChanged,
        }
    }
}

/// Handle returned by `add_event_listener`, used to remove the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Subscriber callback. An `Err` is logged by the store and does not stop
/// the remaining callbacks of the same dispatch.
pub type Listener = Arc<dyn Fn(&StoreEvent) -> AppResult<()> + Send + Sync>;
