//! Host Collaborators and Render Diffing
//!
//! The palette never draws anything itself. A host supplies a
//! [`RenderSurface`] holding one list node per entry and a [`Navigator`]
//! that changes the current location. The [`Renderer`] keeps a snapshot of
//! what the surface currently shows and pushes only the differences.

use crate::matcher::Highlight;
use crate::palette::Palette;

/// Handle to a list node created by the surface
pub type NodeId = usize;

/// Where the palette's list nodes and query input live
pub trait RenderSurface {
    /// Create a list node showing `title` and append it to the container
    fn append_item(&mut self, title: &str, target: &str) -> NodeId;

    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    fn set_selected(&mut self, node: NodeId, selected: bool);

    /// Replace the node's inner content with a highlighted title
    fn set_content(&mut self, node: NodeId, content: &Highlight);

    /// Show or conceal the whole palette
    fn set_revealed(&mut self, revealed: bool);

    fn focus_query(&mut self);

    fn blur_query(&mut self);
}

/// Changes the host's current location
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// Last state pushed to a node
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSnapshot {
    hidden: bool,
    selected: bool,
    content: Highlight,
}

/// Applies palette state to a surface, one diff at a time
#[derive(Debug)]
pub struct Renderer {
    nodes: Vec<NodeId>,
    snapshots: Vec<NodeSnapshot>,
    revealed: bool,
}

impl Renderer {
    /// Create one node per entry, in candidate order, all hidden
    pub fn mount(palette: &Palette, surface: &mut dyn RenderSurface) -> Self {
        let mut nodes = Vec::with_capacity(palette.entries().len());
        let mut snapshots = Vec::with_capacity(palette.entries().len());

        for entry in palette.entries() {
            let node = surface.append_item(entry.title(), entry.target());
            surface.set_hidden(node, true);
            nodes.push(node);
            snapshots.push(NodeSnapshot {
                hidden: true,
                selected: false,
                content: Highlight::plain(entry.title()),
            });
        }

        surface.set_revealed(false);

        Self {
            nodes,
            snapshots,
            revealed: false,
        }
    }

    /// Push every change since the last render. Returns the number of
    /// surface operations issued.
    pub fn render(&mut self, palette: &Palette, surface: &mut dyn RenderSurface) -> usize {
        let mut ops = 0;

        if palette.is_revealed() != self.revealed {
            self.revealed = palette.is_revealed();
            surface.set_revealed(self.revealed);
            ops += 1;
        }

        for ((entry, &node), snapshot) in palette
            .entries()
            .iter()
            .zip(&self.nodes)
            .zip(self.snapshots.iter_mut())
        {
            // Content first so a node never shows stale emphasis when unhidden.
            if entry.is_visible() && entry.highlight() != &snapshot.content {
                snapshot.content = entry.highlight().clone();
                surface.set_content(node, &snapshot.content);
                ops += 1;
            }

            let hidden = !entry.is_visible();
            if hidden != snapshot.hidden {
                snapshot.hidden = hidden;
                surface.set_hidden(node, hidden);
                ops += 1;
            }

            if entry.is_selected() != snapshot.selected {
                snapshot.selected = entry.is_selected();
                surface.set_selected(node, snapshot.selected);
                ops += 1;
            }
        }

        if ops > 0 {
            tracing::trace!(ops, "rendered palette diff");
        }
        ops
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Recorded state of one node
    #[derive(Debug, Clone, Default)]
    pub struct FakeNode {
        pub title: String,
        pub target: String,
        pub hidden: bool,
        pub selected: bool,
        pub html: String,
    }

    /// In-memory surface that records every call
    #[derive(Debug, Default)]
    pub struct FakeSurface {
        pub nodes: Vec<FakeNode>,
        pub revealed: bool,
        pub focused: bool,
        pub ops: Vec<String>,
    }

    impl FakeSurface {
        /// Titles of the nodes currently shown, in node order
        pub fn shown(&self) -> Vec<&str> {
            self.nodes
                .iter()
                .filter(|n| !n.hidden)
                .map(|n| n.title.as_str())
                .collect()
        }
    }

    impl RenderSurface for FakeSurface {
        fn append_item(&mut self, title: &str, target: &str) -> NodeId {
            self.ops.push(format!("append {title}"));
            self.nodes.push(FakeNode {
                title: title.to_string(),
                target: target.to_string(),
                html: title.to_string(),
                ..Default::default()
            });
            self.nodes.len() - 1
        }

        fn set_hidden(&mut self, node: NodeId, hidden: bool) {
            self.ops.push(format!("hidden {node} {hidden}"));
            self.nodes[node].hidden = hidden;
        }

        fn set_selected(&mut self, node: NodeId, selected: bool) {
            self.ops.push(format!("selected {node} {selected}"));
            self.nodes[node].selected = selected;
        }

        fn set_content(&mut self, node: NodeId, content: &Highlight) {
            self.ops.push(format!("content {node}"));
            self.nodes[node].html = content.to_html();
        }

        fn set_revealed(&mut self, revealed: bool) {
            self.ops.push(format!("revealed {revealed}"));
            self.revealed = revealed;
        }

        fn focus_query(&mut self) {
            self.focused = true;
        }

        fn blur_query(&mut self) {
            self.focused = false;
        }
    }

    /// Navigator that remembers where it was sent
    #[derive(Debug, Default)]
    pub struct FakeNavigator {
        pub visited: Vec<String>,
    }

    impl Navigator for FakeNavigator {
        fn navigate(&mut self, target: &str) {
            self.visited.push(target.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeSurface;
    use super::*;
    use crate::page::Candidate;
    use crate::palette::{PaletteEvent, PaletteKey};

    fn palette() -> Palette {
        Palette::new(vec![
            Candidate::new("Home", "/"),
            Candidate::new("About", "/about"),
            Candidate::new("Contact", "/contact"),
        ])
    }

    #[test]
    fn mount_appends_one_hidden_node_per_entry() {
        let palette = palette();
        let mut surface = FakeSurface::default();
        Renderer::mount(&palette, &mut surface);

        assert_eq!(surface.nodes.len(), 3);
        assert!(surface.nodes.iter().all(|n| n.hidden && !n.selected));
        assert_eq!(surface.nodes[2].target, "/contact");
    }

    #[test]
    fn render_pushes_only_changes() {
        let mut palette = palette();
        let mut surface = FakeSurface::default();
        let mut renderer = Renderer::mount(&palette, &mut surface);

        assert_eq!(renderer.render(&palette, &mut surface), 0);

        palette.handle_event(PaletteEvent::Reveal);
        palette.handle_event(PaletteEvent::QueryChanged("o".into()));
        assert!(renderer.render(&palette, &mut surface) > 0);
        assert!(surface.revealed);
        assert_eq!(surface.shown(), vec!["Home", "About", "Contact"]);
        assert!(surface.nodes[0].selected);
        assert_eq!(surface.nodes[0].html, "H<mark>o</mark>me");

        // Nothing changed since the last render.
        assert_eq!(renderer.render(&palette, &mut surface), 0);

        palette.handle_event(PaletteEvent::Key(PaletteKey::ArrowDown));
        surface.ops.clear();
        assert_eq!(renderer.render(&palette, &mut surface), 2);
        assert_eq!(surface.ops, vec!["selected 0 false", "selected 1 true"]);
    }

    #[test]
    fn content_is_replaced_before_a_node_is_shown() {
        let mut palette = palette();
        let mut surface = FakeSurface::default();
        let mut renderer = Renderer::mount(&palette, &mut surface);

        palette.handle_event(PaletteEvent::Reveal);
        palette.handle_event(PaletteEvent::QueryChanged("ct".into()));
        surface.ops.clear();
        renderer.render(&palette, &mut surface);

        let content = surface.ops.iter().position(|op| op == "content 2");
        let shown = surface.ops.iter().position(|op| op == "hidden 2 false");
        assert!(content.is_some() && content < shown);
        assert_eq!(surface.nodes[2].html, "Conta<mark>c</mark><mark>t</mark>");
    }

    #[test]
    fn clearing_the_query_hides_every_node() {
        let mut palette = palette();
        let mut surface = FakeSurface::default();
        let mut renderer = Renderer::mount(&palette, &mut surface);

        palette.handle_event(PaletteEvent::Reveal);
        palette.handle_event(PaletteEvent::QueryChanged("a".into()));
        renderer.render(&palette, &mut surface);
        assert_eq!(surface.shown(), vec!["About", "Contact"]);

        palette.handle_event(PaletteEvent::QueryChanged(String::new()));
        renderer.render(&palette, &mut surface);
        assert!(surface.shown().is_empty());
        assert!(surface.nodes.iter().all(|n| !n.selected));
    }
}
