use ratatui::{
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub(crate) const UNASSIGNED: &str = "(unassigned)";

#[derive(Debug, Clone, Copy)]
pub(crate) enum Tone {
    Info,
    Warning,
    Error,
}

pub(crate) fn segment_label(segment: Option<&str>) -> &str {
    segment.unwrap_or(UNASSIGNED)
}

pub(crate) fn panel(title: &str, is_focus: bool) -> Block<'static> {
    let border_color = if is_focus {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    Block::default()
        .title(title.to_string())
        .title_style(Style::new().bold().fg(Color::White).bg(Color::DarkGray))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(border_color))
}

pub(crate) fn notice(text: &str, tone: Tone) -> Paragraph<'static> {
    let color = match tone {
        Tone::Info => Color::LightBlue,
        Tone::Warning => Color::Yellow,
        Tone::Error => Color::Red,
    };
    Paragraph::new(text.to_string())
        .style(Style::new().fg(color))
        .wrap(Wrap { trim: true })
}
