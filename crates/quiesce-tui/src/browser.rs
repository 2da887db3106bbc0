use std::sync::mpsc::{self, Receiver};

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use quiesce_app::{App, RefreshMode};

use crate::keymap;
use crate::status::{Spinner, status_line};
use crate::theme;
use crate::tree_panel::TreePanel;

const PAGE: isize = 10;
const IDLE_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserExit {
    Quit,
    Interrupted,
}

pub(crate) struct BrowserScreen<'a> {
    app: &'a App,
    spinner: Spinner,
    idle: Receiver<()>,
    drawn_generation: Option<u64>,
    dirty: bool,
    error: Option<String>,
}

impl<'a> BrowserScreen<'a> {
    pub(crate) fn new(app: &'a App) -> Self {
        let (idle_tx, idle_rx) = mpsc::sync_channel(IDLE_BUFFER);
        app.registry().add_idle_listener(idle_tx);

        Self {
            app,
            spinner: Spinner::default(),
            idle: idle_rx,
            drawn_generation: None,
            dirty: true,
            error: None,
        }
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn poll_idle(&mut self) {
        if self.idle.try_iter().count() > 0 {
            self.dirty = true;
        }
    }

    pub(crate) fn on_tick(&mut self) -> bool {
        self.poll_idle();
        let busy = self.app.registry().is_busy();
        if busy {
            self.spinner.next_frame();
        }

        let generation = self.app.tree().snapshot().generation();
        if busy || self.drawn_generation != Some(generation) {
            self.dirty = true;
        }
        self.dirty
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Option<BrowserExit> {
        if keymap::is_ctrl_c(key) {
            return Some(BrowserExit::Interrupted);
        }
        if keymap::is_quit(key) {
            return Some(BrowserExit::Quit);
        }

        self.dirty = true;
        self.error = None;
        let tree = self.app.tree();

        if keymap::is_up(key) {
            tree.move_selection(-1);
        } else if keymap::is_down(key) {
            tree.move_selection(1);
        } else if keymap::is_page_up(key) {
            tree.move_selection(-PAGE);
        } else if keymap::is_page_down(key) {
            tree.move_selection(PAGE);
        } else if keymap::is_toggle(key) {
            tree.toggle_selected_folder();
        } else if keymap::is_cycle_filter(key) {
            tree.set_filter(tree.filter().next());
        } else if keymap::is_collapse_all(key) {
            tree.collapse_all();
            tree.clamp_selection();
        } else if keymap::is_expand_all(key) {
            tree.expand_all();
        } else if keymap::is_range_select(key) {
            if tree.is_range_selecting() {
                tree.cancel_range_select();
            } else {
                tree.start_range_select();
            }
        } else if keymap::is_back(key) {
            tree.cancel_range_select();
        } else if keymap::is_refresh(key)
            && let Err(error) = self.app.refresh_files(RefreshMode::Async)
        {
            self.error = Some(format!("{error:#}"));
        }

        None
    }

    pub(crate) fn render(&mut self, frame: &mut Frame<'_>) {
        let tree = self.app.tree();
        let snapshot = tree.snapshot();
        let status = self.app.status();

        let area = frame.area();
        let [header, body, status_area, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .areas(area);

        let files = snapshot.root().file_count();
        let header_line = Line::from(vec![
            Span::styled("quiesce", theme::focus_prompt()),
            Span::raw("  "),
            Span::styled(
                format!("{files} file(s), filter: {}", snapshot.filter()),
                theme::secondary_text(),
            ),
        ]);
        frame.render_widget(Paragraph::new(header_line), header);

        TreePanel {
            snapshot: &snapshot,
            selected: tree.selected_line(),
            range_anchor: tree.range_anchor(),
            show_line_changes: self.app.config().tree.show_line_changes,
            title: Line::from(snapshot.filter().title()),
        }
        .render(frame, body);

        let status_text = match (&self.error, status_line(&status, self.spinner.frame())) {
            (Some(error), _) => Line::styled(error.clone(), theme::error_prompt()),
            (None, Some(busy)) => Line::styled(busy, theme::busy_prompt()),
            (None, None) => Line::styled("idle", theme::secondary_text()),
        };
        frame.render_widget(Paragraph::new(status_text), status_area);

        let hints = Paragraph::new(compact_hint(area.width))
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center)
            .block(theme::key_block());
        frame.render_widget(hints, footer);

        self.drawn_generation = Some(snapshot.generation());
        self.dirty = false;
    }
}

fn compact_hint(width: u16) -> &'static str {
    if width >= 110 {
        "j/k: move    Enter: fold    f: filter    v: range    c/e: collapse/expand all    r: refresh    q: quit"
    } else if width >= 78 {
        "j/k move  Enter fold  f filter  v range  c/e all  r refresh  q quit"
    } else {
        "j/k | Enter | f | v | c/e | r | q"
    }
}
