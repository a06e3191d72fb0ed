use ratatui::style::{Color, Modifier, Style};

/// Kind of navigation target, judged from the raw href
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    External,
    Email,
    Anchor,
    Script,
    Page,
    Missing,
}

pub fn target_kind(target: &str) -> TargetKind {
    let lower = target.trim().to_ascii_lowercase();
    if lower.is_empty() {
        TargetKind::Missing
    } else if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
    {
        TargetKind::External
    } else if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        TargetKind::Email
    } else if lower.starts_with('#') {
        TargetKind::Anchor
    } else if lower.starts_with("javascript:") {
        TargetKind::Script
    } else {
        TargetKind::Page
    }
}

pub fn color_for_target(target: &str) -> Color {
    match target_kind(target) {
        TargetKind::External => Color::Cyan,
        TargetKind::Email => Color::Magenta,
        TargetKind::Anchor => Color::Yellow,
        TargetKind::Script => Color::LightRed,
        TargetKind::Page => Color::Green,
        TargetKind::Missing => Color::DarkGray,
    }
}

pub fn type_label(target: &str) -> &'static str {
    match target_kind(target) {
        TargetKind::External => "External",
        TargetKind::Email => "Contact",
        TargetKind::Anchor => "Anchor",
        TargetKind::Script => "Script",
        TargetKind::Page => "Page",
        TargetKind::Missing => "No target",
    }
}

pub fn emphasis_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn selected_row_style() -> Style {
    Style::default()
        .bg(Color::Rgb(60, 60, 80))
        .add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_targets() {
        assert_eq!(target_kind("https://example.com"), TargetKind::External);
        assert_eq!(target_kind("//cdn.example.com/x"), TargetKind::External);
        assert_eq!(target_kind("mailto:me@example.com"), TargetKind::Email);
        assert_eq!(target_kind("#section"), TargetKind::Anchor);
        assert_eq!(target_kind("JavaScript:void(0)"), TargetKind::Script);
        assert_eq!(target_kind("/about"), TargetKind::Page);
        assert_eq!(target_kind("  "), TargetKind::Missing);
        assert_eq!(type_label(""), "No target");
    }
}
