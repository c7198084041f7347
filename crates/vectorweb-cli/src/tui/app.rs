use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vectorweb_core::clipboard::Clipboard;
use vectorweb_core::config::VectorWebConfig;
use vectorweb_core::model::ResultItem;
use vectorweb_core::session::SearchSession;

use super::event::{AsyncAction, AsyncResult};

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Editing the page URL field.
    Url,
    /// Editing the query field.
    Query,
    /// Navigating the result list.
    Browse,
}

/// Single-line text field. `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Text before and after the cursor.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Central application state.
pub struct App {
    pub session: SearchSession,
    pub input_mode: InputMode,
    pub should_quit: bool,

    // -- Form --
    pub url: TextField,
    pub query: TextField,
    pub limit: usize,

    // -- Results --
    pub selected: usize,

    // -- Detail modal --
    pub detail_scroll: u16,

    clipboard: Arc<dyn Clipboard>,
    probed: bool,
}

impl App {
    pub fn new(
        config: &VectorWebConfig,
        url: Option<String>,
        query: Option<String>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            session: SearchSession::with_copy_window(config.ui.copy_feedback()),
            input_mode: InputMode::Url,
            should_quit: false,

            url: TextField::new(url.unwrap_or_else(|| config.search.default_url.clone())),
            query: TextField::new(query.unwrap_or_else(|| config.search.default_query.clone())),
            limit: config.search.default_limit,

            selected: 0,
            detail_scroll: 0,

            clipboard,
            probed: false,
        }
    }

    /// The connectivity probe, the first time this is called. Connectivity is
    /// checked once per run and never retried.
    pub fn startup(&mut self) -> Option<AsyncAction> {
        if self.probed {
            return None;
        }
        self.probed = true;
        Some(AsyncAction::Probe)
    }

    /// Process an async result from the worker.
    pub fn handle_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Probe(status) => self.session.apply_probe(status),
            AsyncResult::Search { ticket, resolution } => {
                if self.session.complete(ticket, resolution) {
                    self.selected = 0;
                    self.detail_scroll = 0;
                }
            }
        }
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if self.detail_open() {
            self.handle_detail(key);
            return None;
        }

        match self.input_mode {
            InputMode::Url | InputMode::Query => self.handle_edit(key),
            InputMode::Browse => self.handle_browse(key),
        }
    }

    fn handle_edit(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                self.input_mode = InputMode::Browse;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.input_mode = match self.input_mode {
                    InputMode::Url => InputMode::Query,
                    _ => InputMode::Url,
                };
                None
            }
            KeyCode::Down if self.results_len() > 0 => {
                self.input_mode = InputMode::Browse;
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.active_field_mut()?.clear();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.active_field_mut()?.insert(c);
                None
            }
            KeyCode::Backspace => {
                self.active_field_mut()?.backspace();
                None
            }
            KeyCode::Delete => {
                self.active_field_mut()?.delete();
                None
            }
            KeyCode::Left => {
                self.active_field_mut()?.left();
                None
            }
            KeyCode::Right => {
                self.active_field_mut()?.right();
                None
            }
            KeyCode::Home => {
                self.active_field_mut()?.home();
                None
            }
            KeyCode::End => {
                self.active_field_mut()?.end();
                None
            }
            _ => None,
        }
    }

    fn handle_browse(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') => {
                self.selected = self.results_len().saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.move_selection(10);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-10);
                None
            }
            KeyCode::Enter => {
                self.open_detail();
                None
            }
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Tab => {
                self.input_mode = InputMode::Query;
                None
            }
            KeyCode::Char('u') => {
                self.input_mode = InputMode::Url;
                None
            }
            KeyCode::Char('r') => self.submit(),
            _ => None,
        }
    }

    fn handle_detail(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.close_detail(),
            KeyCode::Char('c') => {
                self.session
                    .presenter_mut()
                    .copy_focused(self.clipboard.as_ref(), Instant::now());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
            _ => {}
        }
    }

    /// Submit the form. An empty field keeps the current outcome and moves
    /// the cursor to that field.
    fn submit(&mut self) -> Option<AsyncAction> {
        match self
            .session
            .submit(&self.url.text, &self.query.text, self.limit)
        {
            Some(pending) => {
                self.selected = 0;
                self.detail_scroll = 0;
                self.input_mode = InputMode::Browse;
                Some(AsyncAction::Search(pending))
            }
            None => {
                self.input_mode = if self.url.text.trim().is_empty() {
                    InputMode::Url
                } else {
                    InputMode::Query
                };
                None
            }
        }
    }

    fn active_field_mut(&mut self) -> Option<&mut TextField> {
        match self.input_mode {
            InputMode::Url => Some(&mut self.url),
            InputMode::Query => Some(&mut self.query),
            InputMode::Browse => None,
        }
    }

    fn open_detail(&mut self) {
        let Some(id) = self.selected_item().map(|item| item.id.clone()) else {
            return;
        };
        self.detail_scroll = 0;
        self.session.presenter_mut().focus(&id);
    }

    fn close_detail(&mut self) {
        self.session.presenter_mut().unfocus();
        self.detail_scroll = 0;
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.results_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let new = (self.selected as i32 + delta).clamp(0, len as i32 - 1);
        self.selected = new as usize;
    }

    pub fn results_len(&self) -> usize {
        self.session.presenter().derived_count().unwrap_or(0)
    }

    pub fn selected_item(&self) -> Option<&ResultItem> {
        self.session.presenter().results()?.items.get(self.selected)
    }

    pub fn detail_open(&self) -> bool {
        self.session.presenter().focused_item().is_some()
    }

    /// Expire timed UI state.
    pub fn tick(&mut self, now: Instant) {
        self.session.presenter_mut().tick(now);
    }
}
