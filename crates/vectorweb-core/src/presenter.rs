use std::time::{Duration, Instant};

use crate::clipboard::Clipboard;
use crate::markup::RichText;
use crate::model::{ResultItem, ResultSet, SearchOutcome};

const DEFAULT_COPY_WINDOW: Duration = Duration::from_secs(2);

/// Marks the item whose content was copied most recently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    pub id: String,
    pub expires_at: Instant,
}

/// Holds the current search outcome plus purely local view state: the
/// focused item and copy confirmation. Never mutates result data.
#[derive(Debug)]
pub struct ResultPresenter {
    outcome: Option<SearchOutcome>,
    /// Id of the focused item; resolved against the current set on access.
    focused: Option<String>,
    copied: Option<CopyFeedback>,
    copy_window: Duration,
}

impl Default for ResultPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_WINDOW)
    }
}

impl ResultPresenter {
    pub fn new(copy_window: Duration) -> Self {
        Self {
            outcome: None,
            focused: None,
            copied: None,
            copy_window,
        }
    }

    /// `None` until the first search is submitted.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.outcome, Some(SearchOutcome::Pending))
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.outcome.as_ref().and_then(SearchOutcome::results)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(SearchOutcome::error)
    }

    /// Drop the previous outcome and focus; a new search is in flight.
    pub fn set_pending(&mut self) {
        self.outcome = Some(SearchOutcome::Pending);
        self.focused = None;
    }

    /// Replace the outcome wholesale. Focus survives only if the new set
    /// still contains the focused id.
    pub fn set_outcome(&mut self, outcome: SearchOutcome) {
        self.outcome = Some(outcome);
        if let Some(id) = self.focused.take() {
            if self.results().is_some_and(|set| set.contains(&id)) {
                self.focused = Some(id);
            }
        }
    }

    /// Focus the item with `id` in the current result set. Clears focus and
    /// returns `false` when there is no such item.
    pub fn focus(&mut self, id: &str) -> bool {
        if self.results().is_some_and(|set| set.contains(id)) {
            self.focused = Some(id.to_string());
            true
        } else {
            self.focused = None;
            false
        }
    }

    pub fn unfocus(&mut self) {
        self.focused = None;
    }

    pub fn focused_item(&self) -> Option<&ResultItem> {
        let id = self.focused.as_deref()?;
        self.results()?.get(id)
    }

    /// Copy `content` as plain text. On success the copy confirmation for
    /// `id` starts (or restarts) its window. Clipboard failures are logged
    /// and swallowed; the confirmation simply never appears.
    pub fn copy(
        &mut self,
        id: &str,
        content: &RichText,
        clipboard: &dyn Clipboard,
        now: Instant,
    ) -> bool {
        match clipboard.set_text(&content.plain_text()) {
            Ok(()) => {
                self.copied = Some(CopyFeedback {
                    id: id.to_string(),
                    expires_at: now + self.copy_window,
                });
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "clipboard write failed");
                false
            }
        }
    }

    /// Copy the focused item's content, if any.
    pub fn copy_focused(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        let Some(item) = self.focused_item() else {
            return false;
        };
        let (id, content) = (item.id.clone(), item.content.clone());
        self.copy(&id, &content, clipboard, now)
    }

    /// Expire the copy confirmation once its window has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.copied.as_ref().is_some_and(|c| now >= c.expires_at) {
            self.copied = None;
        }
    }

    pub fn copied(&self) -> Option<&CopyFeedback> {
        self.copied.as_ref()
    }

    pub fn is_copied(&self, id: &str, now: Instant) -> bool {
        self.copied
            .as_ref()
            .is_some_and(|c| c.id == id && now < c.expires_at)
    }

    /// Number of items in the current Success set.
    pub fn derived_count(&self) -> Option<usize> {
        self.results().map(ResultSet::len)
    }
}
