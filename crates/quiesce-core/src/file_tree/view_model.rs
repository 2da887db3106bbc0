use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;

use super::filter::DisplayFilter;
use super::item::{FileItem, ItemSource};
use super::node::{FileNode, TreeOptions, build_tree};
use super::snapshot::TreeSnapshot;

const NO_ANCHOR: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct Selection {
    pub nodes: Vec<Arc<FileNode>>,
    pub index: usize,
}

#[derive(Debug)]
struct DisplayState {
    filter: DisplayFilter,
    collapsed: HashSet<String>,
    next_ticket: u64,
    published_ticket: u64,
    generation: u64,
}

/// Filtered, collapse-aware tree over an external item list.
///
/// Writers (`set_tree`, collapse and filter changes) serialize on an
/// internal mutex and publish a complete [`TreeSnapshot`] with one atomic
/// swap. Readers only load the current snapshot and never wait on a writer.
/// A rebuild that finishes after a newer one has been published is dropped.
pub struct FileTreeViewModel {
    source: Arc<dyn ItemSource>,
    options: TreeOptions,
    display: Mutex<DisplayState>,
    published: ArcSwap<TreeSnapshot>,
    selected_line: AtomicUsize,
    range_anchor: AtomicUsize,
}

impl fmt::Debug for FileTreeViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTreeViewModel")
            .field("options", &self.options)
            .field("rows", &self.published.load().len())
            .field("selected_line", &self.selected_line())
            .finish_non_exhaustive()
    }
}

impl FileTreeViewModel {
    pub fn new(source: Arc<dyn ItemSource>, options: TreeOptions, filter: DisplayFilter) -> Self {
        Self {
            source,
            options,
            display: Mutex::new(DisplayState {
                filter,
                collapsed: HashSet::new(),
                next_ticket: 0,
                published_ticket: 0,
                generation: 0,
            }),
            published: ArcSwap::from_pointee(TreeSnapshot::empty(filter)),
            selected_line: AtomicUsize::new(0),
            range_anchor: AtomicUsize::new(NO_ANCHOR),
        }
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    pub fn set_tree(&self) {
        let (ticket, filter) = {
            let mut state = self.lock_display();
            state.next_ticket += 1;
            (state.next_ticket, state.filter)
        };

        let items = filter.apply(self.source.items());
        let root = build_tree(items, self.options);

        let mut state = self.lock_display();
        if ticket < state.published_ticket {
            tracing::trace!(ticket, published = state.published_ticket, "stale tree discarded");
            return;
        }
        state.published_ticket = ticket;
        self.publish(&mut state, root, filter);
    }

    pub fn snapshot(&self) -> Arc<TreeSnapshot> {
        self.published.load_full()
    }

    pub fn filter(&self) -> DisplayFilter {
        self.lock_display().filter
    }

    pub fn set_filter(&self, filter: DisplayFilter) -> bool {
        {
            let mut state = self.lock_display();
            if state.filter == filter {
                return false;
            }
            state.filter = filter;
        }
        tracing::debug!(filter = %filter, "display filter changed");
        self.set_tree();
        self.clamp_selection();
        true
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.lock_display().collapsed.contains(path)
    }

    /// Flips `path` in the collapsed set and re-flattens the current tree.
    /// Paths that are not folders in the current tree are accepted and kept.
    pub fn toggle_collapsed(&self, path: &str) {
        let mut state = self.lock_display();
        if !state.collapsed.remove(path) {
            state.collapsed.insert(path.to_string());
        }
        self.reflatten(&mut state);
    }

    pub fn toggle_selected_folder(&self) -> bool {
        let snapshot = self.snapshot();
        let Some(row) = snapshot.get(self.selected_line()) else {
            return false;
        };
        if row.is_file() {
            return false;
        }
        self.toggle_collapsed(row.path());
        true
    }

    pub fn collapse_all(&self) {
        let mut state = self.lock_display();
        let folders = self.published.load().folder_paths();
        state.collapsed.extend(folders);
        self.reflatten(&mut state);
    }

    pub fn expand_all(&self) {
        let mut state = self.lock_display();
        state.collapsed.clear();
        self.reflatten(&mut state);
    }

    pub fn selected_line(&self) -> usize {
        self.selected_line.load(Ordering::Acquire)
    }

    pub fn set_selected_line(&self, line: usize) {
        self.selected_line.store(line, Ordering::Release);
    }

    pub fn move_selection(&self, delta: isize) {
        let len = self.published.load().len();
        if len == 0 {
            self.set_selected_line(0);
            return;
        }

        let current = self.selected_line().min(len - 1);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs()).min(len - 1)
        };
        self.set_selected_line(next);
    }

    pub fn clamp_selection(&self) {
        let last = self.published.load().len().saturating_sub(1);
        if self.selected_line() > last {
            self.set_selected_line(last);
        }
        let anchor = self.range_anchor.load(Ordering::Acquire);
        if anchor != NO_ANCHOR && anchor > last {
            self.range_anchor.store(last, Ordering::Release);
        }
    }

    pub fn start_range_select(&self) {
        self.range_anchor
            .store(self.selected_line(), Ordering::Release);
    }

    pub fn cancel_range_select(&self) {
        self.range_anchor.store(NO_ANCHOR, Ordering::Release);
    }

    pub fn is_range_selecting(&self) -> bool {
        self.range_anchor().is_some()
    }

    pub fn range_anchor(&self) -> Option<usize> {
        let anchor = self.range_anchor.load(Ordering::Acquire);
        (anchor != NO_ANCHOR).then_some(anchor)
    }

    /// `None` when nothing is selected, including a cursor left past the end
    /// of a tree that shrank since it was set.
    pub fn get_selected_items(&self) -> Option<Selection> {
        let snapshot = self.published.load_full();
        let index = self.selected_line();
        let current = snapshot.get(index)?;

        let anchor = self.range_anchor.load(Ordering::Acquire);
        if anchor == NO_ANCHOR {
            return Some(Selection {
                nodes: vec![Arc::clone(&current.node)],
                index,
            });
        }

        let start = anchor.min(index);
        let end = anchor.max(index).min(snapshot.len() - 1);
        let nodes = snapshot.rows()[start..=end]
            .iter()
            .map(|row| Arc::clone(&row.node))
            .collect();
        Some(Selection { nodes, index })
    }

    pub fn selected_files(&self) -> Vec<FileItem> {
        let Some(selection) = self.get_selected_items() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for node in &selection.nodes {
            for item in node.leaves() {
                if seen.insert(item.path.clone()) {
                    files.push(item.clone());
                }
            }
        }
        files
    }

    fn reflatten(&self, state: &mut DisplayState) {
        let current = self.published.load_full();
        self.publish(state, Arc::clone(current.root()), current.filter());
    }

    fn publish(&self, state: &mut DisplayState, root: Arc<FileNode>, filter: DisplayFilter) {
        state.generation += 1;
        let snapshot = TreeSnapshot::materialize(
            root,
            &state.collapsed,
            self.options,
            filter,
            state.generation,
        );
        tracing::trace!(
            generation = state.generation,
            rows = snapshot.len(),
            "tree published"
        );
        self.published.store(Arc::new(snapshot));
    }

    fn lock_display(&self) -> MutexGuard<'_, DisplayState> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
