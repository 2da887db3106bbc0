use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use quiesce_core::file_tree::{NodeKind, TreeRow, TreeSnapshot};

use crate::theme;

const EXPANDED: &str = "▼";
const COLLAPSED: &str = "▶";
const INDENT: &str = "  ";

pub fn tree_lines(snapshot: &TreeSnapshot, show_line_changes: bool) -> Vec<String> {
    snapshot
        .rows()
        .iter()
        .map(|row| {
            styled_row(row, show_line_changes)
                .spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect()
        })
        .collect()
}

pub(crate) fn styled_row(row: &TreeRow, show_line_changes: bool) -> Line<'static> {
    let indent = Span::raw(INDENT.repeat(row.depth));
    match &row.node.kind {
        NodeKind::Folder => {
            let arrow = if row.collapsed { COLLAPSED } else { EXPANDED };
            Line::from(vec![
                indent,
                Span::raw(format!("{arrow} ")),
                Span::styled(row.node.name.clone(), theme::folder()),
            ])
        }
        NodeKind::File(item) => {
            let mut spans = vec![
                indent,
                Span::styled(item.short_status.clone(), theme::file_status(item)),
                Span::raw(" "),
                Span::raw(row.node.name.clone()),
            ];
            if show_line_changes {
                if item.lines_added > 0 {
                    spans.push(Span::styled(
                        format!(" +{}", item.lines_added),
                        theme::lines_added(),
                    ));
                }
                if item.lines_deleted > 0 {
                    spans.push(Span::styled(
                        format!(" -{}", item.lines_deleted),
                        theme::lines_deleted(),
                    ));
                }
            }
            Line::from(spans)
        }
    }
}

pub(crate) struct TreePanel<'a> {
    pub(crate) snapshot: &'a TreeSnapshot,
    pub(crate) selected: usize,
    pub(crate) range_anchor: Option<usize>,
    pub(crate) show_line_changes: bool,
    pub(crate) title: Line<'a>,
}

impl TreePanel<'_> {
    pub(crate) fn render(self, frame: &mut Frame<'_>, area: Rect) {
        if self.snapshot.is_empty() {
            let empty = Paragraph::new(Line::styled("No changed files", theme::secondary_text()))
                .block(theme::chrome(self.title));
            frame.render_widget(empty, area);
            return;
        }

        let selected = self.selected.min(self.snapshot.len() - 1);
        let range = self
            .range_anchor
            .map(|anchor| (anchor.min(selected), anchor.max(selected)));

        let items: Vec<ListItem<'_>> = self
            .snapshot
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let item = ListItem::new(styled_row(row, self.show_line_changes));
                match range {
                    Some((start, end)) if (start..=end).contains(&index) => {
                        item.style(theme::range_row())
                    }
                    _ => item,
                }
            })
            .collect();

        let list = List::new(items)
            .block(theme::chrome(self.title))
            .highlight_style(theme::row_highlight(Color::Cyan));

        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
