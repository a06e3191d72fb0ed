//! Terminal rendering surface and navigator

use crate::error::SpotlightError;
use crate::matcher::Highlight;
use crate::surface::{Navigator, NodeId, RenderSurface};
use crate::tui::search::QueryInput;

/// One suggestion row
#[derive(Debug, Clone)]
pub struct SuggestionNode {
    pub title: String,
    pub target: String,
    pub hidden: bool,
    pub selected: bool,
    pub content: Highlight,
}

/// Suggestion list plus query line, drawn by `ui::draw`
#[derive(Debug)]
pub struct TuiSurface {
    pub nodes: Vec<SuggestionNode>,
    pub revealed: bool,
    pub input: QueryInput,
    pub scroll_offset: usize,
    /// Configured maximum number of suggestion rows
    pub visible_rows: usize,
    /// Rows that fit in the last drawn frame, at most `visible_rows`
    pub window_rows: usize,
}

impl TuiSurface {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            nodes: Vec::new(),
            revealed: false,
            input: QueryInput::default(),
            scroll_offset: 0,
            visible_rows: visible_rows.max(1),
            window_rows: visible_rows.max(1),
        }
    }

    /// Fit the scroll window to `rows` available lines
    pub fn set_window_rows(&mut self, rows: usize) {
        self.window_rows = rows.clamp(1, self.visible_rows);
        self.ensure_visible();
    }

    /// Rows currently listed, in node order
    pub fn shown(&self) -> impl Iterator<Item = &SuggestionNode> + '_ {
        self.nodes.iter().filter(|n| !n.hidden)
    }

    pub fn shown_count(&self) -> usize {
        self.shown().count()
    }

    /// Row position of the selected node among the listed rows
    pub fn selected_row(&self) -> Option<usize> {
        self.shown().position(|n| n.selected)
    }

    /// Scroll so the selected row is inside the window
    pub fn ensure_visible(&mut self) {
        let total = self.shown_count();
        let Some(index) = self.selected_row() else {
            self.scroll_offset = 0;
            return;
        };

        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + self.window_rows {
            self.scroll_offset = index + 1 - self.window_rows;
        }
        self.scroll_offset = self.scroll_offset.min(total.saturating_sub(1));
    }
}

impl RenderSurface for TuiSurface {
    fn append_item(&mut self, title: &str, target: &str) -> NodeId {
        self.nodes.push(SuggestionNode {
            title: title.to_string(),
            target: target.to_string(),
            hidden: false,
            selected: false,
            content: Highlight::plain(title),
        });
        self.nodes.len() - 1
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.hidden = hidden;
        }
    }

    fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.selected = selected;
        }
    }

    fn set_content(&mut self, node: NodeId, content: &Highlight) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.content = content.clone();
        }
    }

    fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }

    fn focus_query(&mut self) {
        self.input.focused = true;
    }

    fn blur_query(&mut self) {
        self.input.focused = false;
    }
}

/// Records the current location and optionally opens it with the system
/// opener
#[derive(Debug, Default)]
pub struct BrowserNavigator {
    pub open_links: bool,
    pub location: Option<String>,
    pub last_error: Option<String>,
}

impl BrowserNavigator {
    pub fn new(open_links: bool) -> Self {
        Self {
            open_links,
            ..Default::default()
        }
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&mut self, target: &str) {
        self.location = Some(target.to_string());
        self.last_error = None;

        if !self.open_links {
            return;
        }

        if let Err(e) = open::that_detached(target) {
            let err = SpotlightError::NavigationError(target.to_string(), e.to_string());
            tracing::warn!(error = %err, recoverable = err.is_recoverable(), "navigation failed");
            self.last_error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(rows: usize, count: usize) -> TuiSurface {
        let mut s = TuiSurface::new(rows);
        for i in 0..count {
            s.append_item(&format!("Item {i}"), "/");
        }
        s
    }

    #[test]
    fn scrolls_to_keep_selection_visible() {
        let mut s = surface_with(3, 6);
        s.set_selected(4, true);
        s.ensure_visible();
        assert_eq!(s.scroll_offset, 2);

        s.set_selected(4, false);
        s.set_selected(0, true);
        s.ensure_visible();
        assert_eq!(s.scroll_offset, 0);
    }

    #[test]
    fn window_shrinks_with_the_terminal_but_not_below_one_or_past_the_limit() {
        let mut s = surface_with(5, 8);
        s.set_selected(4, true);

        s.set_window_rows(2);
        assert_eq!(s.window_rows, 2);
        assert_eq!(s.scroll_offset, 3);

        s.set_window_rows(40);
        assert_eq!(s.window_rows, 5);
        assert_eq!(s.visible_rows, 5);

        s.set_window_rows(0);
        assert_eq!(s.window_rows, 1);
    }

    #[test]
    fn selected_row_counts_only_shown_nodes() {
        let mut s = surface_with(5, 4);
        s.set_hidden(0, true);
        s.set_hidden(1, true);
        s.set_selected(3, true);
        assert_eq!(s.shown_count(), 2);
        assert_eq!(s.selected_row(), Some(1));
    }

    #[test]
    fn navigator_records_location_without_opening() {
        let mut nav = BrowserNavigator::new(false);
        nav.navigate("/about");
        assert_eq!(nav.location.as_deref(), Some("/about"));
        assert!(nav.last_error.is_none());
    }
}
