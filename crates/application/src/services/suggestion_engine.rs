//! Suggestion engine
//!
//! Debounced incremental city search. Keystrokes arm a token with a quiet
//! window; only the latest token fires, and only the response to the latest
//! query is applied. Successful responses are cached per exact query text
//! for the engine's lifetime.
//!
//! The state machine is driven with explicit instants so it can be tested
//! without a runtime; [`SuggestionEngine::settle`] drives it on tokio time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domain::PlaceCandidate;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::geo_resolver::GeoResolver;
use crate::error::ApplicationError;

/// Default quiet window after the last keystroke
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default number of suggestions requested per lookup
pub const DEFAULT_MAX_SUGGESTIONS: u8 = 6;

/// Identifies one armed debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceToken(u64);

/// Debounce timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No lookup pending
    Idle,
    /// A lookup fires once `deadline` passes, unless re-armed
    Armed {
        /// Token of the pending timer
        token: DebounceToken,
        /// Earliest instant the lookup may fire
        deadline: Instant,
    },
}

/// A network lookup the caller must perform and hand back to `complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Trimmed query text
    pub query: String,
    generation: u64,
}

/// Debounced autocomplete over the geo resolver
pub struct SuggestionEngine {
    resolver: Arc<GeoResolver>,
    quiet_window: Duration,
    max_suggestions: u8,
    state: DebounceState,
    query: String,
    next_token: u64,
    generation: u64,
    suggestions: Vec<PlaceCandidate>,
    pending_selection: Option<PlaceCandidate>,
    cache: HashMap<String, Vec<PlaceCandidate>>,
    lookups: usize,
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("state", &self.state)
            .field("query", &self.query)
            .field("suggestions", &self.suggestions.len())
            .field("cached_queries", &self.cache.len())
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}

impl SuggestionEngine {
    /// Create an engine with the default quiet window and suggestion count
    pub fn new(resolver: Arc<GeoResolver>) -> Self {
        Self {
            resolver,
            quiet_window: DEFAULT_DEBOUNCE,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            state: DebounceState::Idle,
            query: String::new(),
            next_token: 0,
            generation: 0,
            suggestions: Vec::new(),
            pending_selection: None,
            cache: HashMap::new(),
            lookups: 0,
        }
    }

    /// Set the quiet window
    #[must_use]
    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }

    /// Set how many suggestions a lookup asks for
    #[must_use]
    pub fn with_max_suggestions(mut self, max_suggestions: u8) -> Self {
        self.max_suggestions = max_suggestions.max(1);
        self
    }

    /// Handle a change of the input text
    ///
    /// Returns the token that will fire, or `None` for blank input.
    pub fn on_query_changed(&mut self, raw: &str, now: Instant) -> Option<DebounceToken> {
        let query = raw.trim();
        self.pending_selection = None;
        self.generation += 1;
        self.query = query.to_string();

        if query.is_empty() {
            self.suggestions.clear();
            self.state = DebounceState::Idle;
            return None;
        }

        self.next_token += 1;
        let token = DebounceToken(self.next_token);
        self.state = DebounceState::Armed {
            token,
            deadline: now + self.quiet_window,
        };
        Some(token)
    }

    /// Fire the timer identified by `token`
    ///
    /// Superseded tokens and early calls do nothing. A cached query applies
    /// its suggestions directly; otherwise a lookup request is returned.
    pub fn fire(&mut self, token: DebounceToken, now: Instant) -> Option<LookupRequest> {
        match self.state {
            DebounceState::Armed {
                token: armed,
                deadline,
            } if armed == token && now >= deadline => {
                self.state = DebounceState::Idle;
            },
            _ => return None,
        }

        if let Some(cached) = self.cache.get(&self.query) {
            debug!(query = %self.query, "Suggestions served from cache");
            self.suggestions = cached.clone();
            return None;
        }

        self.lookups += 1;
        Some(LookupRequest {
            query: self.query.clone(),
            generation: self.generation,
        })
    }

    /// Apply the result of a lookup
    ///
    /// Returns `false` when the input changed since the request was issued;
    /// such responses are discarded.
    pub fn complete(
        &mut self,
        request: &LookupRequest,
        result: Result<Vec<PlaceCandidate>, ApplicationError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(query = %request.query, "Discarding superseded suggestions");
            return false;
        }

        match result {
            Ok(candidates) => {
                self.cache.insert(request.query.clone(), candidates.clone());
                self.suggestions = candidates;
            },
            Err(e) => {
                warn!(query = %request.query, error = %e, "Suggestion lookup failed");
                self.suggestions.clear();
            },
        }
        true
    }

    /// Wait out the quiet window and run the pending lookup, if any
    pub async fn settle(&mut self) -> &[PlaceCandidate] {
        if let DebounceState::Armed { token, deadline } = self.state {
            tokio::time::sleep_until(deadline).await;
            if let Some(request) = self.fire(token, Instant::now()) {
                let result = self
                    .resolver
                    .search_by_name(&request.query, self.max_suggestions)
                    .await;
                self.complete(&request, result);
            }
        }
        &self.suggestions
    }

    /// Remember the candidate the user picked from the list
    pub fn select(&mut self, candidate: PlaceCandidate) {
        self.pending_selection = Some(candidate);
    }

    /// Resolve the submitted input to a place
    ///
    /// A pending selection whose display text equals the input is used
    /// as-is. Otherwise the literal text is geocoded from scratch.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input, `NotFound` when nothing matches, and
    /// network errors from the resolver.
    #[instrument(skip(self))]
    pub async fn submit(&mut self, input: &str) -> Result<PlaceCandidate, ApplicationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ApplicationError::Validation(
                "enter a city name".into(),
            ));
        }

        if let Some(selection) = self.pending_selection.take() {
            if selection.display_name() == input {
                debug!("Using selected suggestion");
                return Ok(selection);
            }
        }

        self.lookups += 1;
        self.resolver.resolve_first(input).await
    }

    /// Current trimmed query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Suggestions for the current query
    #[must_use]
    pub fn suggestions(&self) -> &[PlaceCandidate] {
        &self.suggestions
    }

    /// Debounce timer state
    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.state
    }

    /// The candidate picked from the list, if any
    #[must_use]
    pub const fn pending_selection(&self) -> Option<&PlaceCandidate> {
        self.pending_selection.as_ref()
    }

    /// Number of network lookups issued so far
    #[must_use]
    pub const fn lookup_count(&self) -> usize {
        self.lookups
    }
}
