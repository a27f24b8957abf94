use std::time::Instant;

use tracing::{debug, info, warn};

use crate::history::History;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::render;
use crate::search::{SearchRequest, SearchResponse, Suggestion};
use crate::surface::{Element, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub suggestions_limit: usize,
    pub rate_limit: RateLimitPolicy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            suggestions_limit: 5,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Other,
}

impl Key {
    fn is_navigation(self) -> bool {
        !matches!(self, Key::Other)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListState {
    Closed,
    Open,
}

#[derive(Debug)]
struct SessionState {
    previous_query: String,
    // 1-based; meaningless while `suggestions` is empty
    selected: usize,
    suggestions: Vec<Suggestion>,
    history: History,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            previous_query: String::new(),
            selected: 1,
            suggestions: Vec::new(),
            history: History::new(),
        }
    }
}

/// Search-as-you-type widget bound to one surface.
///
/// The host feeds it events (`handle_input`, `handle_key`, `handle_blur`,
/// clicks), polls it for released searches, and hands completed responses
/// back through `apply_response`.
pub struct Autocomplete<S: Surface> {
    surface: S,
    config: WidgetConfig,
    state: SessionState,
    limiter: RateLimiter<String>,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl<S: Surface> Autocomplete<S> {
    pub fn new(surface: S, config: WidgetConfig) -> Self {
        let mut w = Self {
            surface,
            limiter: RateLimiter::new(config.rate_limit),
            config,
            state: SessionState::default(),
            next_seq: 0,
            in_flight: None,
        };
        render::render_suggestions(&mut w.surface, &[], 1);
        render::announce(&mut w.surface, 0);
        render::render_history(&mut w.surface, w.state.history.entries());
        w
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn list_state(&self) -> ListState {
        if self.state.suggestions.is_empty() {
            ListState::Closed
        } else {
            ListState::Open
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.state.suggestions
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.state
            .suggestions
            .get(self.state.selected.saturating_sub(1))
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn previous_query(&self) -> &str {
        &self.state.previous_query
    }

    /// When the host should next call `poll`, if a search is waiting.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.limiter.next_deadline()
    }

    /// Field value changed (keyup).
    pub fn handle_input(&mut self, now: Instant) {
        let keyword = self.surface.value(Element::SearchField);
        if keyword.is_empty() {
            self.clear_suggestions(false);
            self.state.previous_query.clear();
            return;
        }
        if keyword.trim() != self.state.previous_query.trim() {
            self.limiter.schedule(now, keyword);
        } else {
            // back to what is already displayed; drop any newer pending term
            self.limiter.cancel();
        }
    }

    /// Release a rate-limited keyword as a search request.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.limiter.poll(now)?;
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight = Some(seq);
        self.state.previous_query = query.clone();
        debug!(target: "core::widget", "dispatch seq={} query={:?}", seq, query);
        Some(SearchRequest { seq, query })
    }

    /// Whether `seq` is the latest search still awaiting its response.
    pub fn is_current(&self, seq: u64) -> bool {
        self.in_flight == Some(seq)
    }

    /// Apply a completed search. Returns true if the list was re-rendered.
    pub fn apply_response(&mut self, resp: SearchResponse) -> bool {
        if !self.is_current(resp.seq) {
            debug!(target: "core::widget", "discard stale response seq={} query={:?} latest={:?}", resp.seq, resp.query, self.in_flight);
            return false;
        }
        match resp.result {
            Ok(mut suggestions) => {
                suggestions.truncate(self.config.suggestions_limit);
                debug!(target: "core::widget", "render seq={} count={}", resp.seq, suggestions.len());
                self.render_suggestions(suggestions);
                true
            }
            Err(e) => {
                warn!(target: "core::widget", "search failed seq={} query={:?}: {}", resp.seq, resp.query, e);
                false
            }
        }
    }

    /// Key pressed in the search field (keydown). Returns true when the host
    /// must suppress the key's default behaviour.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let count = self.state.suggestions.len();
        match key {
            Key::ArrowDown if count > 0 => {
                self.state.selected = if self.state.selected < count {
                    self.state.selected + 1
                } else {
                    1
                };
                self.highlight();
            }
            Key::ArrowUp if count > 0 => {
                self.state.selected = if self.state.selected > 1 {
                    self.state.selected - 1
                } else {
                    count
                };
                self.highlight();
            }
            Key::Escape if count > 0 => {
                self.clear_suggestions(false);
            }
            Key::Enter => {
                if let Some(title) = self.selected().map(|s| s.title.clone()) {
                    self.add_history_entry(&title);
                    self.clear_suggestions(true);
                }
            }
            _ => {}
        }
        key.is_navigation()
    }

    pub fn handle_blur(&mut self) {
        self.clear_suggestions(false);
    }

    /// Mouse press on the option at `index` (0-based).
    pub fn click_suggestion(&mut self, index: usize) {
        let Some(title) = self.state.suggestions.get(index).map(|s| s.title.clone()) else {
            return;
        };
        self.add_history_entry(&title);
        self.clear_suggestions(false);
    }

    pub fn add_history_entry(&mut self, title: &str) {
        if self.state.history.add_entry(title) {
            info!(target: "core::widget", "history add {:?}", title);
            render::render_history(&mut self.surface, self.state.history.entries());
        }
    }

    pub fn remove_history_entry(&mut self, title: &str) {
        if self.state.history.remove_entry(title) {
            info!(target: "core::widget", "history remove {:?}", title);
            render::render_history(&mut self.surface, self.state.history.entries());
        }
    }

    /// Delete-button click on the rendered history item at `index`. The
    /// title is read back from the item's heading.
    pub fn click_history_delete(&mut self, index: usize) {
        let title = self
            .surface
            .children(Element::HistoryList)
            .get(index)
            .and_then(|item| item.find("h6"))
            .map(|h| h.text.clone());
        if let Some(title) = title {
            self.remove_history_entry(&title);
        }
    }

    fn render_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        if suggestions.is_empty() {
            self.close();
            return;
        }
        self.state.selected = 1;
        self.state.suggestions = suggestions;
        render::render_suggestions(&mut self.surface, &self.state.suggestions, 1);
        render::announce(&mut self.surface, self.state.suggestions.len());
    }

    fn highlight(&mut self) {
        render::render_suggestions(
            &mut self.surface,
            &self.state.suggestions,
            self.state.selected,
        );
    }

    fn close(&mut self) {
        self.state.selected = 1;
        self.state.suggestions.clear();
        render::render_suggestions(&mut self.surface, &[], 1);
        render::announce(&mut self.surface, 0);
    }

    fn clear_suggestions(&mut self, clear_input: bool) {
        if clear_input {
            self.surface.set_value(Element::SearchField, "");
            self.state.previous_query.clear();
        }
        self.limiter.cancel();
        self.in_flight = None;
        self.close();
    }
}
