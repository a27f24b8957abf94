use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use providers::tmdb::{TmdbClient, TmdbConfig};
use ratatui::layout::Rect;
use suggest_core::{
    Autocomplete, Element, Key, MemorySurface, SearchDispatcher, SearchResponse, Surface,
    WidgetConfig,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tracing::{error, info, warn};
use unicode_segmentation::UnicodeSegmentation;

pub mod history;
pub mod input;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    History,
}

pub struct App {
    pub widget: Autocomplete<MemorySurface>,
    dispatcher: Option<SearchDispatcher<TmdbClient>>,
    responses: Option<UnboundedReceiver<SearchResponse>>,
    pub input: String,
    pub input_cursor: usize,
    pub focus: Focus,
    pub history_current: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub dirty: bool,
    // Config or request problem shown in the status bar
    pub notice: Option<String>,
    pub input_area: Option<Rect>,
    pub suggestions_area: Option<Rect>,
    pub history_area: Option<Rect>,
}

impl App {
    pub fn new(handle: Handle) -> Self {
        let built = TmdbConfig::from_env_and_file().and_then(|cfg| {
            let widget_cfg = cfg.widget();
            TmdbClient::new(cfg).map(|client| (client, widget_cfg))
        });
        match built {
            Ok((client, widget_cfg)) => {
                info!(target: "tui", "search client ready limit={} policy={:?}", widget_cfg.suggestions_limit, widget_cfg.rate_limit);
                let (dispatcher, rx) = SearchDispatcher::new(client, handle);
                let mut app = Self::offline(widget_cfg);
                app.dispatcher = Some(dispatcher);
                app.responses = Some(rx);
                app
            }
            Err(e) => {
                error!(target: "tui", "search client unavailable: {:#}", e);
                let mut app = Self::offline(WidgetConfig::default());
                app.notice = Some(format!("{}", e));
                app
            }
        }
    }

    /// App without a search backend; released searches are only logged.
    pub fn offline(config: WidgetConfig) -> Self {
        Self {
            widget: Autocomplete::new(MemorySurface::new(), config),
            dispatcher: None,
            responses: None,
            input: String::new(),
            input_cursor: 0,
            focus: Focus::Input,
            history_current: 0,
            should_quit: false,
            show_help: false,
            dirty: true,
            notice: None,
            input_area: None,
            suggestions_area: None,
            history_area: None,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if let KeyEventKind::Press = key.kind {
            if self.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                    self.show_help = false;
                    self.dirty = true;
                }
                return;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                }
                KeyCode::F(1) => {
                    self.show_help = true;
                }
                KeyCode::Tab | KeyCode::BackTab => {
                    self.toggle_focus();
                }
                _ => match self.focus {
                    Focus::Input => self.on_input_key(key),
                    Focus::History => self.on_history_key(key),
                },
            }
            // Mark dirty on any handled key press path.
            self.dirty = true;
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        let nav = match key.code {
            KeyCode::Up => Key::ArrowUp,
            KeyCode::Down => Key::ArrowDown,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            _ => Key::Other,
        };
        if self.widget.handle_key(nav) {
            self.sync_from_surface();
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::Left if ctrl => self.move_cursor_word_left(),
            KeyCode::Right if ctrl => self.move_cursor_word_right(),
            KeyCode::Left => {
                self.input_cursor = self.input_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let len = self.input.graphemes(true).count();
                if self.input_cursor < len {
                    self.input_cursor += 1;
                }
            }
            KeyCode::Home => self.move_cursor_line_start(),
            KeyCode::End => self.move_cursor_line_end(),
            KeyCode::Char('a') if ctrl => self.move_cursor_line_start(),
            KeyCode::Char('e') if ctrl => self.move_cursor_line_end(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.kill_to_line_start(),
            KeyCode::Char('k') if ctrl => self.kill_to_line_end(),
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                let s = ch.encode_utf8(&mut buf);
                self.insert_text(s);
            }
            _ => {}
        }
        self.commit_input(Instant::now());
    }

    pub fn on_paste(&mut self, text: &str) {
        if !matches!(self.focus, Focus::Input) {
            return;
        }
        // single-line field
        let flat = text.replace(['\r', '\n'], " ");
        self.insert_text(&flat);
        self.commit_input(Instant::now());
        self.dirty = true;
    }

    /// Push the edited buffer into the surface and let the widget react.
    fn commit_input(&mut self, now: Instant) {
        self.widget
            .surface_mut()
            .set_value(Element::SearchField, &self.input);
        self.widget.handle_input(now);
    }

    /// The widget may clear the field (Enter); mirror that into the buffer.
    fn sync_from_surface(&mut self) {
        let v = self.widget.surface().value(Element::SearchField);
        if v != self.input {
            self.input = v;
            self.input_cursor = self.input.graphemes(true).count();
        }
    }

    fn toggle_focus(&mut self) {
        match self.focus {
            Focus::Input if !self.widget.history().is_empty() => {
                self.widget.handle_blur();
                self.focus = Focus::History;
                self.clamp_history_current();
            }
            _ => self.focus = Focus::Input,
        }
    }

    pub fn on_mouse_down(&mut self, x: u16, y: u16) {
        if let Some(area) = self.suggestions_area {
            if let Some(row) = inner_row(area, x, y) {
                self.widget.click_suggestion(row);
                self.sync_from_surface();
                self.dirty = true;
                return;
            }
        }
        if let Some(area) = self.history_area {
            if let Some(row) = inner_row(area, x, y) {
                if matches!(self.focus, Focus::Input) {
                    self.widget.handle_blur();
                }
                let on_delete = x + 1 + crate::strings::DELETE_MARK.len() as u16 >= area.x + area.width;
                if on_delete {
                    self.widget.click_history_delete(row);
                }
                if self.widget.history().is_empty() {
                    self.focus = Focus::Input;
                } else {
                    self.focus = Focus::History;
                    self.history_current = row;
                    self.clamp_history_current();
                }
                self.dirty = true;
                return;
            }
        }
        if let Some(area) = self.input_area {
            if inner_row(area, x, y).is_some() {
                self.focus = Focus::Input;
                self.dirty = true;
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    pub fn on_tick_at(&mut self, now: Instant) {
        while let Some(req) = self.widget.poll(now) {
            match &self.dispatcher {
                Some(d) => d.dispatch(req),
                None => {
                    warn!(target: "tui", "no search client; dropping query {:?}", req.query);
                }
            }
        }
        let mut disconnected = false;
        if let Some(rx) = &mut self.responses {
            for _ in 0..64 {
                match rx.try_recv() {
                    Ok(resp) => {
                        // stale responses must not touch the status bar either
                        if self.widget.is_current(resp.seq) {
                            match &resp.result {
                                Ok(_) => self.notice = None,
                                Err(e) => self.notice = Some(format!("search failed: {}", e)),
                            }
                        }
                        self.widget.apply_response(resp);
                        self.dirty = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            self.responses = None;
        }
    }
}

// Row index inside a bordered area, if (x, y) hits its interior.
fn inner_row(area: Rect, x: u16, y: u16) -> Option<usize> {
    let inside = x > area.x
        && x + 1 < area.x + area.width
        && y > area.y
        && y + 1 < area.y + area.height;
    inside.then(|| (y - area.y - 1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use suggest_core::{ListState, SearchError, Suggestion};
    use tokio::sync::mpsc::unbounded_channel;

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn open_list(app: &mut App, titles: &[&str]) {
        let req = app
            .widget
            .poll(Instant::now() + Duration::from_secs(1))
            .expect("pending search");
        app.widget.apply_response(SearchResponse {
            seq: req.seq,
            query: req.query,
            result: Ok(titles.iter().map(|t| Suggestion::new(*t)).collect()),
        });
    }

    #[test]
    fn typing_releases_one_search() {
        let mut app = App::offline(WidgetConfig::default());
        type_str(&mut app, "bat");
        assert_eq!(app.widget.surface().value(Element::SearchField), "bat");
        assert_eq!(app.widget.previous_query(), "");
        app.on_tick_at(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.widget.previous_query(), "bat");
        assert!(app.widget.next_deadline().is_none());
    }

    #[test]
    fn arrows_and_enter_drive_the_widget() {
        let mut app = App::offline(WidgetConfig::default());
        type_str(&mut app, "bat");
        open_list(&mut app, &["Batman", "Batman Returns"]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.widget.selected().unwrap().title, "Batman Returns");
        // the cursor did not move: Down was consumed by the list
        assert_eq!(app.input_cursor, 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.widget.history().entries()[0].title, "Batman Returns");
        assert_eq!(app.input, "");
        assert_eq!(app.input_cursor, 0);
        assert_eq!(app.widget.list_state(), ListState::Closed);
    }

    #[test]
    fn tab_blurs_and_history_delete_removes() {
        let mut app = App::offline(WidgetConfig::default());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Input, "empty history is not focusable");

        app.widget.add_history_entry("Alien");
        app.widget.add_history_entry("Heat");
        type_str(&mut app, "bat");
        open_list(&mut app, &["Batman"]);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        assert_eq!(app.widget.list_state(), ListState::Closed);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Delete);
        let titles: Vec<_> = app.widget.history().entries().iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles, vec!["Alien"]);
        press(&mut app, KeyCode::Delete);
        assert!(app.widget.history().is_empty());
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn clicking_a_suggestion_adds_history() {
        let mut app = App::offline(WidgetConfig::default());
        type_str(&mut app, "bat");
        open_list(&mut app, &["Batman", "Batman Returns"]);
        app.suggestions_area = Some(Rect::new(0, 3, 40, 4));
        app.on_mouse_down(5, 5);
        assert_eq!(app.widget.history().entries()[0].title, "Batman Returns");
        assert_eq!(app.widget.list_state(), ListState::Closed);
        assert_eq!(app.input, "bat");
    }

    #[test]
    fn clicking_delete_mark_removes_history_row() {
        let mut app = App::offline(WidgetConfig::default());
        app.widget.add_history_entry("Alien");
        app.widget.add_history_entry("Heat");
        app.history_area = Some(Rect::new(0, 10, 40, 6));
        app.on_mouse_down(36, 11);
        let titles: Vec<_> = app.widget.history().entries().iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles, vec!["Heat"]);
        assert_eq!(app.focus, Focus::History);
    }

    #[test]
    fn late_responses_leave_the_notice_alone() {
        let mut app = App::offline(WidgetConfig::default());
        let (tx, rx) = unbounded_channel();
        app.responses = Some(rx);
        let t0 = Instant::now();

        type_str(&mut app, "b");
        let req_b = app.widget.poll(t0 + Duration::from_secs(1)).expect("b released");
        type_str(&mut app, "a");
        let req_ba = app.widget.poll(t0 + Duration::from_secs(2)).expect("ba released");

        // "ba" answers first, then the failed "b" straggles in
        tx.send(SearchResponse {
            seq: req_ba.seq,
            query: req_ba.query.clone(),
            result: Ok(vec![Suggestion::new("Bambi")]),
        })
        .unwrap();
        tx.send(SearchResponse {
            seq: req_b.seq,
            query: req_b.query.clone(),
            result: Err(SearchError::Network("connection reset".into())),
        })
        .unwrap();
        app.on_tick_at(t0);
        assert_eq!(app.notice, None);
        assert_eq!(app.widget.suggestions(), &[Suggestion::new("Bambi")]);

        // a real failure is kept when an older success arrives after it
        type_str(&mut app, "t");
        let req_bat = app.widget.poll(t0 + Duration::from_secs(3)).expect("bat released");
        type_str(&mut app, "m");
        let req_batm = app.widget.poll(t0 + Duration::from_secs(4)).expect("batm released");
        tx.send(SearchResponse {
            seq: req_batm.seq,
            query: req_batm.query.clone(),
            result: Err(SearchError::Timeout("10s".into())),
        })
        .unwrap();
        tx.send(SearchResponse {
            seq: req_bat.seq,
            query: req_bat.query.clone(),
            result: Ok(vec![Suggestion::new("Batman")]),
        })
        .unwrap();
        app.on_tick_at(t0);
        assert!(app.notice.as_deref().is_some_and(|n| n.starts_with("search failed")));
        assert_eq!(app.widget.suggestions(), &[Suggestion::new("Bambi")]);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut app = App::offline(WidgetConfig::default());
        app.on_paste("the\ndark knight");
        assert_eq!(app.input, "the dark knight");
        assert!(app.widget.next_deadline().is_some());
    }
}
