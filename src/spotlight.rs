//! Mounted Palette
//!
//! [`Spotlight`] ties a [`Palette`] to a host: it appends the list nodes at
//! mount, holds the global shortcut subscription, carries out each
//! transition's [`Effect`] and renders the resulting diff.

use crate::config::SpotlightConfig;
use crate::error::Result;
use crate::page::{self, Candidate};
use crate::palette::{Effect, Palette, PaletteEvent};
use crate::shortcut::{Chord, ShortcutListeners, Subscription, SubscriptionId};
use crate::surface::{Navigator, RenderSurface, Renderer};
use crossterm::event::KeyEvent;

pub struct Spotlight<S: RenderSurface, N: Navigator> {
    palette: Palette,
    renderer: Renderer,
    surface: S,
    navigator: N,
    subscription: Subscription,
}

impl<S: RenderSurface, N: Navigator> Spotlight<S, N> {
    /// Build the palette, populate the surface and register the shortcut
    pub fn mount(
        candidates: Vec<Candidate>,
        chord: Chord,
        mut surface: S,
        navigator: N,
        listeners: &ShortcutListeners,
    ) -> Self {
        let palette = Palette::new(candidates);
        let renderer = Renderer::mount(&palette, &mut surface);
        let subscription = listeners.subscribe(chord);

        tracing::info!(
            entries = palette.entries().len(),
            shortcut = %chord,
            "spotlight mounted"
        );

        Self {
            palette,
            renderer,
            surface,
            navigator,
            subscription,
        }
    }

    /// Discover candidates in `html` with the configured selector, then mount
    pub fn from_page(
        config: &SpotlightConfig,
        html: &str,
        surface: S,
        navigator: N,
        listeners: &ShortcutListeners,
    ) -> Result<Self> {
        let selector = config.selector()?;
        let chord = config.chord()?;
        let candidates = page::discover(html, &selector);
        Ok(Self::mount(candidates, chord, surface, navigator, listeners))
    }

    /// Run one event through the palette and bring the surface up to date
    pub fn dispatch(&mut self, event: PaletteEvent) {
        let mut next = Some(event);

        while let Some(event) = next.take() {
            match self.palette.handle_event(event) {
                Some(Effect::FocusQuery) => self.surface.focus_query(),
                Some(Effect::BlurQuery) => {
                    self.surface.blur_query();
                    next = Some(PaletteEvent::Blur);
                }
                Some(Effect::Activate(index)) => {
                    if let Some(entry) = self.palette.entry(index) {
                        entry.activate(&mut self.navigator);
                    }
                }
                None => {}
            }
        }

        self.renderer.render(&self.palette, &mut self.surface);
    }

    /// Offer a host-level key press. Returns true if it was this palette's
    /// shortcut.
    pub fn handle_global_key(&mut self, fired: &[SubscriptionId]) -> bool {
        if fired.contains(&self.subscription.id()) {
            self.dispatch(PaletteEvent::Reveal);
            true
        } else {
            false
        }
    }

    /// Dispatch a raw key press through the host's listeners
    pub fn handle_key_event(&mut self, listeners: &ShortcutListeners, key: &KeyEvent) -> bool {
        let fired = listeners.dispatch(key);
        self.handle_global_key(&fired)
    }

    /// Release the shortcut listener and hand back the host collaborators
    pub fn unmount(self) -> (S, N) {
        let Spotlight {
            surface,
            navigator,
            subscription,
            ..
        } = self;
        drop(subscription);
        tracing::info!("spotlight unmounted");
        (surface, navigator)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn shortcut(&self) -> Chord {
        self.subscription.chord()
    }
}
