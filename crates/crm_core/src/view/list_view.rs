//! List screen state machine.
//!
//! # Responsibility
//! - Track `Loading -> Ready | Failed` for one collection.
//! - Derive the visible subset from a search term.
//! - Track a multi-selection for bulk actions.
//!
//! # Invariants
//! - Only the most recently started load may change state.
//! - A failed load keeps previously loaded records.
//! - Selected ids are always a subset of loaded record ids.

use crate::model::record::{Record, RecordId};
use crate::repo::{RecordRepository, RepoResult};
use crate::service::resource_service::ResourceService;
use crate::view::filter::filter_records;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Load state of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    /// Display message of the last failed load.
    Failed(String),
}

impl ViewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl Display for ViewState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Identifies one started load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Whether a finished load was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started; the result was dropped.
    Stale,
}

pub struct ListView<R: Record> {
    state: ViewState,
    records: Vec<R>,
    search: String,
    latest_ticket: u64,
    selected: BTreeSet<RecordId>,
}

impl<R: Record> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ListView<R> {
    /// Fresh view in `Loading`, as on mount.
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            records: Vec::new(),
            search: String::new(),
            latest_ticket: 0,
            selected: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Every loaded record, unfiltered.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Enters `Loading` and returns the ticket the result must carry.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.state = ViewState::Loading;
        LoadTicket(self.latest_ticket)
    }

    /// Applies a load result unless a newer load has been started since.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: RepoResult<Vec<R>>) -> LoadOutcome {
        if ticket.0 != self.latest_ticket {
            debug!(
                "event=list_load module=view status=stale collection={} ticket={}",
                R::COLLECTION,
                ticket.0
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(records) => {
                self.records = records;
                let loaded: BTreeSet<RecordId> = self.records.iter().map(Record::id).collect();
                self.selected.retain(|id| loaded.contains(id));
                self.state = ViewState::Ready;
            }
            Err(err) => {
                warn!(
                    "event=list_load module=view status=error collection={} error={}",
                    R::COLLECTION,
                    err
                );
                self.state = ViewState::Failed(err.to_string());
            }
        }
        LoadOutcome::Applied
    }

    /// Re-enters `Loading` after a failure.
    pub fn retry(&mut self) -> LoadTicket {
        self.begin_load()
    }

    /// Runs one complete load through `service`.
    pub fn load<S: RecordRepository<R>>(&mut self, service: &ResourceService<R, S>) -> LoadOutcome {
        let ticket = self.begin_load();
        self.finish_load(ticket, service.get_all())
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Records matching the current search; empty unless `Ready`.
    pub fn visible(&self) -> Vec<&R> {
        if !self.state.is_ready() {
            return Vec::new();
        }
        filter_records(&self.records, &self.search)
    }

    /// Flips selection of a loaded record; returns whether it is now selected.
    ///
    /// Ids that are not loaded are ignored.
    pub fn toggle_selected(&mut self, id: RecordId) -> bool {
        if !self.records.iter().any(|record| record.id() == id) {
            return false;
        }
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selected.iter().copied().collect()
    }
}
