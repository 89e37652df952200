use tracing::{debug, error};

use crate::error::{FetchError, Screen};
use crate::models::{DetailView, MovieSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Empty,
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Handed out when a fetch starts; a result is applied only with the latest ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    guid: Option<String>,
}

#[derive(Debug)]
pub struct ListScreen {
    state: ViewState<Vec<MovieSummary>>,
    generation: u64,
}

impl Default for ListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ListScreen {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<MovieSummary>> {
        &self.state
    }

    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = ViewState::Loading;
        Ticket {
            generation: self.generation,
            guid: None,
        }
    }

    /// Returns `false` when the result belongs to a superseded fetch and was dropped.
    pub fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<MovieSummary>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale feed result"
            );
            return false;
        }
        self.state = match result {
            Ok(movies) if movies.is_empty() => ViewState::Empty,
            Ok(movies) => ViewState::Ready(movies),
            Err(e) => {
                error!(operation = "load_feed", error = %e, "Failed to load feed");
                ViewState::Error(e.user_message(Screen::List).to_string())
            }
        };
        true
    }
}

/// Detail screen. Tracks the identifier it currently cares about; results for any
/// other identifier, or from an older navigation to the same one, are ignored.
#[derive(Debug)]
pub struct DetailScreen {
    state: ViewState<DetailView>,
    generation: u64,
    active: Option<String>,
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailScreen {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
            active: None,
        }
    }

    pub fn state(&self) -> &ViewState<DetailView> {
        &self.state
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn begin(&mut self, guid: &str) -> Ticket {
        self.generation += 1;
        self.active = Some(guid.to_string());
        self.state = ViewState::Loading;
        Ticket {
            generation: self.generation,
            guid: Some(guid.to_string()),
        }
    }

    pub fn apply(&mut self, ticket: &Ticket, result: Result<DetailView, FetchError>) -> bool {
        if ticket.generation != self.generation || ticket.guid != self.active {
            debug!(
                guid = ticket.guid.as_deref().unwrap_or_default(),
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale detail result"
            );
            return false;
        }
        let guid = ticket.guid.as_deref().unwrap_or_default();
        self.state = match result {
            Ok(view) if view.detail.id == guid => ViewState::Ready(view),
            Ok(view) => {
                let e = FetchError::Shape(format!(
                    "detail for '{guid}' resolved as '{}'",
                    view.detail.id
                ));
                error!(operation = "load_detail", guid = %guid, error = %e, "Detail identifier mismatch");
                ViewState::Error(e.user_message(Screen::Detail).to_string())
            }
            Err(e) => {
                error!(operation = "load_detail", guid = %guid, error = %e, "Failed to load detail");
                ViewState::Error(e.user_message(Screen::Detail).to_string())
            }
        };
        true
    }
}
