//! Global Shortcuts
//!
//! A [`Chord`] is a key plus modifiers parsed from strings like
//! `"ctrl+space"`. Components register chords with the host's
//! [`ShortcutListeners`] and get back a [`Subscription`]; dropping the
//! subscription unregisters the listener.

use crate::error::{Result, SpotlightError};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Default chord that reveals the palette
pub const DEFAULT_SHORTCUT: &str = "ctrl+space";

// ============================================================================
// Chord
// ============================================================================

/// The non-modifier part of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKey {
    /// A printable character, stored lowercase
    Char(char),
    Space,
    Enter,
    Tab,
    Esc,
    F(u8),
}

impl fmt::Display for ChordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordKey::Char(c) => write!(f, "{}", c.to_uppercase()),
            ChordKey::Space => write!(f, "Space"),
            ChordKey::Enter => write!(f, "Enter"),
            ChordKey::Tab => write!(f, "Tab"),
            ChordKey::Esc => write!(f, "Esc"),
            ChordKey::F(n) => write!(f, "F{}", n),
        }
    }
}

/// A keyboard shortcut: modifiers plus one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: ChordKey,
}

impl Chord {
    pub fn new(key: ChordKey) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            key,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Whether a terminal key press triggers this chord
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.kind == KeyEventKind::Release {
            return false;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        // Some terminals report Ctrl+Space as NUL.
        if event.code == KeyCode::Null {
            return self.key == ChordKey::Space && self.ctrl && !self.alt && !self.shift;
        }

        if ctrl != self.ctrl || alt != self.alt {
            return false;
        }

        match (self.key, event.code) {
            (ChordKey::Char(want), KeyCode::Char(got)) => {
                // Shifted letters arrive uppercase, with or without SHIFT.
                let shifted = shift || got.is_uppercase();
                got.to_lowercase().eq(want.to_lowercase()) && (!self.shift || shifted)
            }
            (ChordKey::Space, KeyCode::Char(' ')) => shift == self.shift,
            (ChordKey::Enter, KeyCode::Enter)
            | (ChordKey::Tab, KeyCode::Tab)
            | (ChordKey::Esc, KeyCode::Esc) => shift == self.shift,
            (ChordKey::Tab, KeyCode::BackTab) => self.shift,
            (ChordKey::F(want), KeyCode::F(got)) => want == got && shift == self.shift,
            _ => false,
        }
    }
}

impl FromStr for Chord {
    type Err = SpotlightError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |msg: String| SpotlightError::InvalidShortcut(s.to_string(), msg);

        if s.trim().is_empty() {
            return Err(invalid("shortcut is empty".to_string()));
        }

        let (mut ctrl, mut alt, mut shift) = (false, false, false);
        let mut key = None;

        for token in s.split('+').map(|t| t.trim().to_lowercase()) {
            let parsed = match token.as_str() {
                "ctrl" | "control" | "ctl" => {
                    ctrl = true;
                    continue;
                }
                "alt" | "option" | "opt" => {
                    alt = true;
                    continue;
                }
                "shift" => {
                    shift = true;
                    continue;
                }
                "space" => ChordKey::Space,
                "enter" | "return" => ChordKey::Enter,
                "tab" => ChordKey::Tab,
                "esc" | "escape" => ChordKey::Esc,
                "" => return Err(invalid("empty token".to_string())),
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => ChordKey::Char(c),
                        (Some('f'), Some(_)) => match other[1..].parse::<u8>() {
                            Ok(n) if (1..=24).contains(&n) => ChordKey::F(n),
                            _ => return Err(invalid(format!("unknown key '{}'", other))),
                        },
                        _ => return Err(invalid(format!("unknown key '{}'", other))),
                    }
                }
            };

            if key.replace(parsed).is_some() {
                return Err(invalid("more than one key".to_string()));
            }
        }

        let key = key.ok_or_else(|| invalid("shortcut has no key, only modifiers".to_string()))?;
        Ok(Chord {
            ctrl,
            alt,
            shift,
            key,
        })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl Default for Chord {
    fn default() -> Self {
        Chord::new(ChordKey::Space).ctrl()
    }
}

// ============================================================================
// Listener registry
// ============================================================================

pub type SubscriptionId = u64;

#[derive(Debug, Default)]
struct Bindings {
    next_id: SubscriptionId,
    /// Registration order is dispatch order
    entries: Vec<(SubscriptionId, Chord)>,
}

/// Host-level keyboard listeners, shared by everything mounted on one screen
#[derive(Debug, Clone, Default)]
pub struct ShortcutListeners {
    inner: Rc<RefCell<Bindings>>,
}

impl ShortcutListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `chord`
    pub fn subscribe(&self, chord: Chord) -> Subscription {
        let mut bindings = self.inner.borrow_mut();
        bindings.next_id += 1;
        let id = bindings.next_id;
        bindings.entries.push((id, chord));
        tracing::debug!(id, %chord, "shortcut subscribed");

        Subscription {
            id,
            chord,
            listeners: Rc::downgrade(&self.inner),
        }
    }

    /// Ids of every subscription the key press triggers
    pub fn dispatch(&self, event: &KeyEvent) -> Vec<SubscriptionId> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, chord)| chord.matches(event))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registered listener; unregisters itself when dropped
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    chord: Chord,
    listeners: Weak<RefCell<Bindings>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn chord(&self) -> Chord {
        self.chord
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
            tracing::debug!(id = self.id, chord = %self.chord, "shortcut unsubscribed");
        }
    }
}
