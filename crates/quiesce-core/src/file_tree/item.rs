use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileItem {
    pub path: String,
    pub short_status: String,
    pub has_unstaged_changes: bool,
    pub has_staged_changes: bool,
    pub tracked: bool,
    pub has_merge_conflicts: bool,
    pub has_inline_merge_conflicts: bool,
    pub lines_added: u32,
    pub lines_deleted: u32,
}

impl FileItem {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        leaf_name(&self.path)
    }
}

pub(crate) fn leaf_name(path: &str) -> &str {
    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

pub trait ItemSource: Send + Sync {
    fn items(&self) -> Vec<FileItem>;
}

impl<F> ItemSource for F
where
    F: Fn() -> Vec<FileItem> + Send + Sync,
{
    fn items(&self) -> Vec<FileItem> {
        self()
    }
}

#[derive(Debug, Default)]
pub struct SharedItems {
    items: ArcSwap<Vec<FileItem>>,
}

impl SharedItems {
    pub fn new(items: Vec<FileItem>) -> Self {
        Self {
            items: ArcSwap::from_pointee(items),
        }
    }

    pub fn replace(&self, items: Vec<FileItem>) {
        self.items.store(Arc::new(items));
    }

    pub fn current(&self) -> Arc<Vec<FileItem>> {
        self.items.load_full()
    }

    pub fn len(&self) -> usize {
        self.items.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.load().is_empty()
    }
}

impl ItemSource for SharedItems {
    fn items(&self) -> Vec<FileItem> {
        self.items.load().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::{FileItem, ItemSource, SharedItems};

    #[test]
    fn name_is_last_segment() {
        assert_eq!(FileItem::new("dir2/dir2/file4").name(), "file4");
        assert_eq!(FileItem::new("file1").name(), "file1");
        assert_eq!(FileItem::new("untracked-dir/").name(), "untracked-dir");
    }

    #[test]
    fn shared_items_are_replaced_wholesale() {
        let shared = SharedItems::new(vec![FileItem::new("a"), FileItem::new("b")]);
        let before = shared.current();

        shared.replace(vec![FileItem::new("c")]);

        assert_eq!(before.len(), 2);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.items()[0].path, "c");
        shared.replace(Vec::new());
        assert!(shared.is_empty());
    }

    #[test]
    fn closures_serve_as_item_sources() {
        let source = || vec![FileItem::new("dir1/file2"), FileItem::new("file1")];
        let paths: Vec<String> = source.items().into_iter().map(|item| item.path).collect();
        assert_eq!(paths, vec!["dir1/file2", "file1"]);
    }
}
