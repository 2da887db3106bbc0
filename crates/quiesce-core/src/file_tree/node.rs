use std::collections::BTreeMap;
use std::sync::Arc;

use super::item::{FileItem, leaf_name};

pub const ROOT_PATH: &str = ".";
const ROOT_NAME: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    pub show_root_item: bool,
    pub compress_single_child_folders: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_root_item: false,
            compress_single_child_folders: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File(FileItem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<Arc<FileNode>>,
}

impl FileNode {
    fn file(item: FileItem) -> Self {
        Self {
            path: item.path.clone(),
            name: leaf_name(&item.path).to_string(),
            kind: NodeKind::File(item),
            children: Vec::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    pub fn item(&self) -> Option<&FileItem> {
        match &self.kind {
            NodeKind::File(item) => Some(item),
            NodeKind::Folder => None,
        }
    }

    pub fn leaves(&self) -> Vec<&FileItem> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File(_) => 1,
            NodeKind::Folder => self.children.iter().map(|child| child.file_count()).sum(),
        }
    }

    pub(crate) fn folder_paths(&self, output: &mut Vec<String>) {
        if self.is_file() {
            return;
        }
        if !self.is_root() {
            output.push(self.path.clone());
        }
        for child in &self.children {
            child.folder_paths(output);
        }
    }

    fn collect_leaves<'a>(&'a self, output: &mut Vec<&'a FileItem>) {
        match &self.kind {
            NodeKind::File(item) => output.push(item),
            NodeKind::Folder => {
                for child in &self.children {
                    child.collect_leaves(output);
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct FolderBuilder {
    folders: BTreeMap<String, FolderBuilder>,
    files: Vec<FileItem>,
}

impl FolderBuilder {
    fn insert(&mut self, item: FileItem) {
        let segments: Vec<String> = item
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .collect();
        let folder_depth = segments.len().saturating_sub(1);

        let mut folder = self;
        for segment in &segments[..folder_depth] {
            folder = folder.folders.entry(segment.clone()).or_default();
        }
        folder.files.push(item);
    }

    fn into_children(self, prefix: &str, compress: bool) -> Vec<Arc<FileNode>> {
        let mut children = Vec::with_capacity(self.folders.len() + self.files.len());

        for (segment, folder) in self.folders {
            let path = join_path(prefix, &segment);
            children.push(Arc::new(folder.into_folder_node(segment, path, compress)));
        }

        let mut files = self.files;
        files.sort_by(|left, right| leaf_name(&left.path).cmp(leaf_name(&right.path)));
        children.extend(files.into_iter().map(|item| Arc::new(FileNode::file(item))));

        children
    }

    fn into_folder_node(self, name: String, path: String, compress: bool) -> FileNode {
        if compress && self.files.is_empty() && self.folders.len() == 1 {
            let mut folders = self.folders.into_iter();
            if let Some((segment, only_child)) = folders.next() {
                let merged_name = format!("{name}/{segment}");
                let merged_path = join_path(&path, &segment);
                return only_child.into_folder_node(merged_name, merged_path, compress);
            }
            return FileNode {
                path,
                name,
                kind: NodeKind::Folder,
                children: Vec::new(),
            };
        }

        let children = self.into_children(&path, compress);
        FileNode {
            path,
            name,
            kind: NodeKind::Folder,
            children,
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}/{segment}")
    }
}

pub fn build_tree(items: Vec<FileItem>, options: TreeOptions) -> Arc<FileNode> {
    let mut root = FolderBuilder::default();
    for item in items {
        root.insert(item);
    }

    Arc::new(FileNode {
        path: ROOT_PATH.to_string(),
        name: ROOT_NAME.to_string(),
        kind: NodeKind::Folder,
        children: root.into_children("", options.compress_single_child_folders),
    })
}
