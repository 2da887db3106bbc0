use std::collections::HashSet;
use std::sync::Arc;

use super::filter::DisplayFilter;
use super::item::FileItem;
use super::node::{FileNode, NodeKind, ROOT_PATH, TreeOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node: Arc<FileNode>,
    pub depth: usize,
    pub collapsed: bool,
}

impl TreeRow {
    pub fn path(&self) -> &str {
        &self.node.path
    }

    pub fn is_file(&self) -> bool {
        self.node.is_file()
    }
}

#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    root: Arc<FileNode>,
    rows: Vec<TreeRow>,
    filter: DisplayFilter,
    generation: u64,
}

impl TreeSnapshot {
    pub(crate) fn empty(filter: DisplayFilter) -> Self {
        Self {
            root: Arc::new(FileNode {
                path: ROOT_PATH.to_string(),
                name: "/".to_string(),
                kind: NodeKind::Folder,
                children: Vec::new(),
            }),
            rows: Vec::new(),
            filter,
            generation: 0,
        }
    }

    pub(crate) fn materialize(
        root: Arc<FileNode>,
        collapsed: &HashSet<String>,
        options: TreeOptions,
        filter: DisplayFilter,
        generation: u64,
    ) -> Self {
        let mut rows = Vec::new();
        if shows_root_row(&root, options) {
            push_rows(&root, 0, collapsed, &mut rows);
        } else {
            for child in &root.children {
                push_rows(child, 0, collapsed, &mut rows);
            }
        }

        Self {
            root,
            rows,
            filter,
            generation,
        }
    }

    pub fn root(&self) -> &Arc<FileNode> {
        &self.root
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TreeRow> {
        self.rows.get(index)
    }

    pub fn filter(&self) -> DisplayFilter {
        self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index_of_path(&self, path: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.path() == path)
    }

    pub fn leaf_paths(&self) -> Vec<&str> {
        self.root
            .leaves()
            .into_iter()
            .map(|item| item.path.as_str())
            .collect()
    }

    pub fn leaves(&self) -> Vec<&FileItem> {
        self.root.leaves()
    }

    pub fn folder_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.root.folder_paths(&mut paths);
        paths
    }
}

fn shows_root_row(root: &FileNode, options: TreeOptions) -> bool {
    options.show_root_item
        && (root.children.len() > 1 || root.children.iter().any(|child| !child.is_file()))
}

fn push_rows(
    node: &Arc<FileNode>,
    depth: usize,
    collapsed_paths: &HashSet<String>,
    rows: &mut Vec<TreeRow>,
) {
    let collapsed = !node.is_file() && collapsed_paths.contains(&node.path);
    rows.push(TreeRow {
        node: Arc::clone(node),
        depth,
        collapsed,
    });
    if collapsed {
        return;
    }
    for child in &node.children {
        push_rows(child, depth + 1, collapsed_paths, rows);
    }
}
