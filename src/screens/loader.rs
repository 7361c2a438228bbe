//! Generic owner-scoped list loader shared by the routine, progress and
//! injury screens.

use crate::backend::{CollectionPath, DocumentStore, FieldFilter};
use crate::config::CollectionsConfig;
use crate::models::FromDocument;
use crate::session::SessionState;

/// Render state of a list screen
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Populated(Vec<T>),
    Empty { message: String },
    /// No owner could be resolved; nothing was fetched
    Unauthenticated,
}

impl<T> ListState<T> {
    pub fn empty(message: impl Into<String>) -> Self {
        ListState::Empty {
            message: message.into(),
        }
    }

    /// Populated for a non-empty list, otherwise the empty state
    pub fn from_items(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            ListState::empty(empty_message)
        } else {
            ListState::Populated(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Populated(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn map<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> ListState<U> {
        match self {
            ListState::Loading => ListState::Loading,
            ListState::Populated(items) => ListState::Populated(f(items)),
            ListState::Empty { message } => ListState::Empty { message },
            ListState::Unauthenticated => ListState::Unauthenticated,
        }
    }
}

/// A list screen over one subcollection of an owner's profile
pub trait OwnerScoped: Send + Sync {
    type Record: FromDocument + Send;
    type View: Send;

    /// Message of the empty state
    fn empty_message(&self) -> &str;

    fn collection(&self, collections: &CollectionsConfig, owner_id: &str) -> CollectionPath;

    /// Server-side filter of the read
    fn filter(&self) -> Option<FieldFilter> {
        None
    }

    /// Map records into view models
    fn present(&self, records: Vec<Self::Record>) -> Vec<Self::View>;
}

/// Owner of a screen: the navigation parameter if given, else the session user
pub fn resolve_owner(session: &SessionState, nav_param: Option<&str>) -> Option<String> {
    nav_param
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .or_else(|| session.uid())
        .map(str::to_string)
}

/// Read the owner's records and resolve them into a render state.
///
/// Without an owner no call is issued. Backend failures are logged and resolve
/// to the empty state; records that fail to decode are skipped.
pub async fn load<S: OwnerScoped>(
    screen: &S,
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    owner_id: Option<&str>,
) -> ListState<S::View> {
    let Some(owner_id) = owner_id else {
        tracing::warn!("Owner-scoped read without an authenticated user");
        return ListState::Unauthenticated;
    };

    let collection = screen.collection(collections, owner_id);
    let result = match screen.filter() {
        Some(filter) => store.query_documents(&collection, &filter).await,
        None => store.list_documents(&collection).await,
    };

    let documents = match result {
        Ok(documents) => documents,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", collection, e);
            return ListState::empty(screen.empty_message());
        }
    };

    let records: Vec<S::Record> = documents
        .iter()
        .filter_map(|doc| match S::Record::from_document(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping document {} in {}: {}", doc.id, collection, e);
                None
            }
        })
        .collect();

    tracing::debug!("Loaded {} record(s) from {}", records.len(), collection);

    ListState::from_items(screen.present(records), screen.empty_message())
}

/// Proof of the mount a load was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Holds a screen's list state and drops results that arrive after the
/// screen was unmounted or reloaded.
#[derive(Debug)]
pub struct ScreenSlot<T> {
    generation: u64,
    state: ListState<T>,
}

impl<T> Default for ScreenSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: ListState::Loading,
        }
    }
}

impl<T> ScreenSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load; only the returned ticket may apply a result
    pub fn mount(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ListState::Loading;
        LoadTicket(self.generation)
    }

    /// Invalidate every outstanding ticket
    pub fn unmount(&mut self) {
        self.generation += 1;
    }

    /// Apply a result; returns false when the ticket is stale
    pub fn apply(&mut self, ticket: LoadTicket, state: ListState<T>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!("Dropping stale result for load {}", ticket.0);
            return false;
        }
        self.state = state;
        true
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }
}
