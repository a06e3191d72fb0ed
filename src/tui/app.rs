use crate::config::SpotlightConfig;
use crate::page::{self, Candidate, Selector};
use crate::palette::{PaletteEvent, PaletteKey};
use crate::shortcut::ShortcutListeners;
use crate::spotlight::Spotlight;
use crate::surface::RenderSurface;
use crate::tui::surface::{BrowserNavigator, TuiSurface};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;

pub struct App {
    pub spotlight: Spotlight<TuiSurface, BrowserNavigator>,
    pub listeners: ShortcutListeners,

    // Page view
    pub page_title: String,
    pub links: Vec<Candidate>,
    pub page_offset: usize,
    pub page_rows: usize,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: &SpotlightConfig, html: &str) -> crate::Result<Self> {
        let listeners = ShortcutListeners::new();
        let selector = config.selector()?;
        let links = page::discover(html, &selector);

        let spotlight = Spotlight::mount(
            links.clone(),
            config.chord()?,
            TuiSurface::new(config.visible_rows),
            BrowserNavigator::new(config.open_links),
            &listeners,
        );

        Ok(Self {
            spotlight,
            listeners,
            page_title: page_title(html),
            links,
            page_offset: 0,
            page_rows: 20,
            should_quit: false,
        })
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.spotlight.handle_key_event(&self.listeners, &key) {
            return;
        }

        if self.spotlight.surface().input.focused {
            self.handle_query_key(key);
        } else {
            self.handle_page_key(key);
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        let palette_key = match key.code {
            KeyCode::Esc => Some(PaletteKey::Escape),
            KeyCode::Up => Some(PaletteKey::ArrowUp),
            KeyCode::Down => Some(PaletteKey::ArrowDown),
            KeyCode::Enter => Some(PaletteKey::Enter),
            _ => None,
        };
        if let Some(palette_key) = palette_key {
            self.spotlight.dispatch(PaletteEvent::Key(palette_key));
            return;
        }

        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            // Focus moves off the query line.
            self.spotlight.surface_mut().blur_query();
            self.spotlight.dispatch(PaletteEvent::Blur);
            return;
        }

        let input = &mut self.spotlight.surface_mut().input;
        let changed = match key.code {
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                input.insert(c)
            }
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.home();
                false
            }
            KeyCode::End => {
                input.end();
                false
            }
            _ => false,
        };

        if changed {
            let text = input.query.clone();
            self.spotlight.dispatch(PaletteEvent::QueryChanged(text));
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        let total = self.links.len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.page_offset = self.page_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.page_offset + 1 < total {
                    self.page_offset += 1;
                }
            }
            KeyCode::PageUp => {
                self.page_offset = self.page_offset.saturating_sub(self.page_rows);
            }
            KeyCode::PageDown => {
                self.page_offset = (self.page_offset + self.page_rows).min(total.saturating_sub(1));
            }
            KeyCode::Home => self.page_offset = 0,
            _ => {}
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.spotlight.navigator().location.as_deref()
    }
}

/// Text of the page's `<title>`, or a placeholder
fn page_title(html: &str) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| page::discover(html, &selector).into_iter().next())
        .map(|c| c.title)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled page".to_string())
}
