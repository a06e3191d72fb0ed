//! Palette Controller
//!
//! Owns every entry, the current query, the matched subset and the single
//! active index. [`Palette::handle_event`] is the whole state machine: it
//! mutates only this struct and reports host-side work as an [`Effect`].
//!
//! Invariants held after every event:
//! - an entry is visible iff it belongs to the matched set
//! - the active index is `Some(i)` with `i < matched.len()` iff the matched
//!   set is non-empty
//! - at most one entry is selected, and it is the active one

use crate::matcher::{Entry, Pattern};
use crate::page::Candidate;

/// Coarse palette state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteState {
    Hidden,
    /// Revealed with an empty query; nothing is listed
    RevealedEmpty,
    /// Revealed with a non-empty query; the matched set may still be empty
    RevealedFiltering,
}

/// Keys the query input forwards to the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
}

/// Everything the palette reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    /// The global shortcut fired
    Reveal,
    /// The query input lost focus
    Blur,
    /// The query input's text changed
    QueryChanged(String),
    Key(PaletteKey),
}

/// Work the host must carry out after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FocusQuery,
    /// Blur the query input; the host answers with [`PaletteEvent::Blur`]
    BlurQuery,
    /// Activate the entry at this index into [`Palette::entries`]
    Activate(usize),
}

pub struct Palette {
    entries: Vec<Entry>,
    query: String,
    /// Indices into `entries`, in candidate order
    matched: Vec<usize>,
    /// Index into `matched`
    active: Option<usize>,
    revealed: bool,
}

impl Palette {
    /// Build a hidden palette with every entry hidden and unselected
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let entries: Vec<Entry> = candidates.into_iter().map(Entry::from).collect();
        tracing::debug!(entries = entries.len(), "palette initialized");

        Self {
            entries,
            query: String::new(),
            matched: Vec::new(),
            active: None,
            revealed: false,
        }
    }

    pub fn state(&self) -> PaletteState {
        if !self.revealed {
            PaletteState::Hidden
        } else if self.query.trim().is_empty() {
            PaletteState::RevealedEmpty
        } else {
            PaletteState::RevealedFiltering
        }
    }

    /// Apply one event. Events that do not apply in the current state are
    /// ignored.
    pub fn handle_event(&mut self, event: PaletteEvent) -> Option<Effect> {
        match event {
            PaletteEvent::Reveal => {
                self.reveal();
                Some(Effect::FocusQuery)
            }
            // Keyboard-surface events only arrive while the input has focus.
            _ if !self.revealed => {
                tracing::trace!(?event, "ignoring event while hidden");
                None
            }
            PaletteEvent::Blur => {
                self.hide();
                None
            }
            PaletteEvent::QueryChanged(text) => {
                self.set_query(text);
                None
            }
            PaletteEvent::Key(PaletteKey::Escape) => Some(Effect::BlurQuery),
            PaletteEvent::Key(PaletteKey::ArrowDown) => {
                self.select_next();
                None
            }
            PaletteEvent::Key(PaletteKey::ArrowUp) => {
                self.select_prev();
                None
            }
            PaletteEvent::Key(PaletteKey::Enter) => self.active_entry_index().map(Effect::Activate),
        }
    }

    fn reveal(&mut self) {
        if !self.revealed {
            tracing::info!(query = %self.query, "palette revealed");
        }
        self.revealed = true;
    }

    fn hide(&mut self) {
        if self.revealed {
            tracing::info!("palette hidden");
        }
        self.revealed = false;
    }

    fn set_query(&mut self, text: String) {
        self.query = text;
        self.set_active(None);

        match Pattern::compile(self.query.trim()) {
            None => {
                for entry in &mut self.entries {
                    entry.set_visible(false);
                }
                self.matched.clear();
                tracing::debug!("query cleared");
            }
            Some(pattern) => {
                self.matched = self
                    .entries
                    .iter_mut()
                    .enumerate()
                    .filter_map(|(i, entry)| entry.test(&pattern).then_some(i))
                    .collect();

                if !self.matched.is_empty() {
                    self.set_active(Some(0));
                }
                tracing::debug!(
                    query = %pattern.as_str(),
                    matched = self.matched.len(),
                    "query changed"
                );
            }
        }
    }

    fn select_next(&mut self) {
        if let Some(i) = self.active {
            if i + 1 < self.matched.len() {
                self.set_active(Some(i + 1));
            }
        }
    }

    fn select_prev(&mut self) {
        if let Some(i) = self.active {
            if i > 0 {
                self.set_active(Some(i - 1));
            }
        }
    }

    /// Move the selection marker to `index` (into `matched`)
    fn set_active(&mut self, index: Option<usize>) {
        if let Some(entry) = self.active_entry_index() {
            self.entries[entry].set_selected(false);
        }

        self.active = index.filter(|&i| i < self.matched.len());

        if let Some(entry) = self.active_entry_index() {
            self.entries[entry].set_selected(true);
        }
    }

    /// All entries, in candidate order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Indices into [`Palette::entries`] of the matched set
    pub fn matched_indices(&self) -> &[usize] {
        &self.matched
    }

    pub fn matched(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.matched.iter().map(move |&i| &self.entries[i])
    }

    /// Position of the active entry within the matched set
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn active_entry_index(&self) -> Option<usize> {
        self.active.and_then(|i| self.matched.get(i).copied())
    }

    pub fn active_entry(&self) -> Option<&Entry> {
        self.active_entry_index().map(|i| &self.entries[i])
    }

    /// Query text as last typed, untrimmed
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}
