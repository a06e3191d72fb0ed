//! Spotlight - keyboard-driven link palette
//!
//! Collects the navigable elements of a page and lets the user reach any of
//! them from the keyboard: a global shortcut reveals a query line, typing
//! filters the links by case-insensitive subsequence match, the arrow keys
//! move the selection and Enter navigates.
//!
//! # Features
//!
//! - **Subsequence Matching**: query characters must appear in order, gaps allowed
//! - **Highlighting**: matched characters are reported for emphasis
//! - **Diff Rendering**: only entries whose state changed are touched on the surface
//! - **Scoped Shortcuts**: each mounted palette owns its shortcut and releases it on unmount
//! - **Terminal Host**: a ratatui view of the page with the palette as an overlay
//!
//! # Example
//!
//! ```
//! use spotlight::{Palette, PaletteEvent, Candidate};
//!
//! let mut palette = Palette::new(vec![
//!     Candidate::new("Home", "/"),
//!     Candidate::new("About", "/about"),
//!     Candidate::new("Contact", "/contact"),
//! ]);
//!
//! palette.handle_event(PaletteEvent::Reveal);
//! palette.handle_event(PaletteEvent::QueryChanged("ab".to_string()));
//!
//! let titles: Vec<&str> = palette.matched().map(|e| e.title()).collect();
//! assert_eq!(titles, vec!["About"]);
//! assert_eq!(palette.active_entry().map(|e| e.target()), Some("/about"));
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod page;
pub mod palette;
pub mod shortcut;
pub mod spotlight;
pub mod surface;
pub mod tui;

// Re-export main types
pub use config::SpotlightConfig;
pub use error::{Result, SpotlightError};
pub use matcher::{Captures, Entry, Highlight, Pattern, Segment};
pub use page::{discover, load_page, Candidate, Selector};
pub use palette::{Effect, Palette, PaletteEvent, PaletteKey, PaletteState};
pub use shortcut::{Chord, ChordKey, ShortcutListeners, Subscription, SubscriptionId};
pub use spotlight::Spotlight;
pub use surface::{Navigator, NodeId, RenderSurface, Renderer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
