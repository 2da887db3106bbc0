use quiesce_core::file_tree::FileItem;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

pub(crate) fn chrome<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn key_block() -> Block<'static> {
    chrome("Keys")
}

pub(crate) fn row_highlight(color: Color) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn range_row() -> Style {
    Style::default().bg(Color::DarkGray)
}

pub(crate) fn focus_prompt() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn busy_prompt() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn error_prompt() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub(crate) fn secondary_text() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}

pub(crate) fn folder() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn file_status(item: &FileItem) -> Style {
    if item.has_merge_conflicts {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if item.has_staged_changes && !item.has_unstaged_changes {
        Style::default().fg(Color::Green)
    } else if item.has_unstaged_changes || !item.tracked {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}

pub(crate) fn lines_added() -> Style {
    Style::default().fg(Color::Green)
}

pub(crate) fn lines_deleted() -> Style {
    Style::default().fg(Color::Red)
}
