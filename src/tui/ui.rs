use crate::matcher::Highlight;
use crate::tui::app::App;
use crate::tui::colors;
use crate::tui::surface::TuiSurface;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(3),    // Page links
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(frame, app, chunks[0]);
    draw_page(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.spotlight.surface().revealed {
        draw_palette(frame, app.spotlight.surface_mut(), area);
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = format!(" {} ", app.page_title);
    let bar = Paragraph::new(text).style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(40, 40, 50))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(bar, area);
}

fn draw_page(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(false))
        .title(format!(" Links ({}) ", app.links.len()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = inner.height as usize;
    app.page_rows = rows.max(1);

    let start = app.page_offset.min(app.links.len());
    let end = (start + rows).min(app.links.len());

    for (visual_idx, link) in app.links[start..end].iter().enumerate() {
        let label = colors::type_label(&link.target);
        let line = Line::from(vec![
            Span::styled(
                format!(" {:<10}", label),
                Style::default().fg(colors::color_for_target(&link.target)),
            ),
            Span::styled(link.title.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}", link.target),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let row = Rect::new(inner.x, inner.y + visual_idx as u16, inner.width, 1);
        frame.render_widget(Paragraph::new(line), row);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let navigator = app.spotlight.navigator();
    let left_text = if let Some(err) = &navigator.last_error {
        format!(" \u{26A0} {}", err)
    } else if let Some(location) = &navigator.location {
        format!(" \u{2192} {}", location)
    } else {
        format!(" {} links", app.links.len())
    };

    let right_text = format!(
        " {}:Search  Tab:Leave  Enter:Open  q:Quit ",
        app.spotlight.shortcut()
    );

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        left_text
    };

    let style = if navigator.last_error.is_some() {
        Style::default().fg(Color::White).bg(Color::Rgb(135, 0, 0))
    } else {
        Style::default().fg(Color::White).bg(Color::Rgb(0, 95, 135))
    };

    frame.render_widget(Paragraph::new(status_str).style(style), area);
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 3;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

const QUERY_PREFIX: &str = " > ";

fn draw_palette(frame: &mut Frame, surface: &mut TuiSurface, area: Rect) {
    let width = area.width.saturating_sub(4).min(72);
    // Borders, query line and separator
    let height = surface.visible_rows as u16 + 4;
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border_style(surface.input.focused))
        .title(" Spotlight ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height < 2 {
        return;
    }

    let query_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let query_line = Line::from(vec![
        Span::styled(QUERY_PREFIX, Style::default().fg(Color::Cyan)),
        Span::styled(surface.input.query.clone(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(query_line), query_area);

    let separator = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    frame.render_widget(
        Paragraph::new("\u{2500}".repeat(inner.width as usize))
            .style(Style::default().fg(Color::DarkGray)),
        separator,
    );

    let list_area = Rect::new(
        inner.x,
        inner.y + 2,
        inner.width,
        inner.height.saturating_sub(2),
    );
    surface.set_window_rows(list_area.height as usize);
    draw_suggestions(frame, surface, list_area);

    if surface.input.focused {
        let before_cursor = &surface.input.query[..surface.input.cursor_pos];
        let cursor_x = query_area.x + (QUERY_PREFIX.width() + before_cursor.width()) as u16;
        let cursor_x = cursor_x.min(query_area.x + query_area.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(cursor_x, query_area.y));
    }
}

fn draw_suggestions(frame: &mut Frame, surface: &TuiSurface, area: Rect) {
    if area.height == 0 {
        return;
    }

    let total = surface.shown_count();
    if total == 0 {
        let hint = if surface.input.query.trim().is_empty() {
            format!(" Type to search {} links", surface.nodes.len())
        } else {
            " No matches".to_string()
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            Rect::new(area.x, area.y, area.width, 1),
        );
        return;
    }

    let rows = surface
        .shown()
        .skip(surface.scroll_offset)
        .take(area.height as usize);

    for (visual_idx, node) in rows.enumerate() {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(highlight_spans(&node.content));
        spans.push(Span::styled(
            format!("  {}", node.target),
            Style::default().fg(colors::color_for_target(&node.target)),
        ));

        let mut line = Line::from(spans);
        if node.selected {
            line = line.style(colors::selected_row_style());
        }

        let row = Rect::new(area.x, area.y + visual_idx as u16, area.width, 1);
        frame.render_widget(Paragraph::new(line), row);
    }
}

fn highlight_spans(highlight: &Highlight) -> Vec<Span<'static>> {
    highlight
        .segments()
        .iter()
        .filter(|seg| !seg.text().is_empty())
        .map(|seg| {
            if seg.is_emphasis() {
                Span::styled(seg.text().to_string(), colors::emphasis_style())
            } else {
                Span::raw(seg.text().to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotlightConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    const PAGE: &str = r#"<title>Site</title>
        <a href="/">Home</a><a href="/about">About</a><a href="https://x.org">Contact</a>"#;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app() -> App {
        let config = SpotlightConfig {
            open_links: false,
            ..Default::default()
        };
        App::new(&config, PAGE).unwrap()
    }

    #[test]
    fn hidden_palette_shows_page_only() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Site"));
        assert!(screen.contains("Links (3)"));
        assert!(screen.contains("External"));
        assert!(!screen.contains("Spotlight"));
    }

    #[test]
    fn revealed_palette_lists_matches() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL));
        let screen = render(&mut app);
        assert!(screen.contains("Spotlight"));
        assert!(screen.contains("Type to search 3 links"));

        for c in "zz".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert!(render(&mut app).contains("No matches"));
    }

    fn render_sized(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
    }

    #[test]
    fn small_frame_does_not_shrink_the_configured_list() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL));
        let configured = app.spotlight.surface().visible_rows;

        render_sized(&mut app, 80, 8);
        assert_eq!(app.spotlight.surface().visible_rows, configured);
        assert!(app.spotlight.surface().window_rows < configured);

        render_sized(&mut app, 80, 40);
        assert_eq!(app.spotlight.surface().window_rows, configured);
    }

    #[test]
    fn highlight_spans_skip_empty_gaps() {
        let highlight = crate::matcher::Pattern::compile("h")
            .and_then(|p| p.captures("Home"))
            .map(|c| c.highlight("Home"))
            .unwrap();
        let spans = highlight_spans(&highlight);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["H", "ome"]);
        assert_eq!(spans[0].style, colors::emphasis_style());
    }
}
