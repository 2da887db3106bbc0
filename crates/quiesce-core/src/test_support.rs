use crate::file_tree::FileItem;

pub fn item(path: &str, short_status: &str) -> FileItem {
    FileItem {
        path: path.to_string(),
        short_status: short_status.to_string(),
        ..FileItem::default()
    }
}

pub fn sample_items() -> Vec<FileItem> {
    vec![
        FileItem {
            has_unstaged_changes: true,
            tracked: true,
            ..item("dir1/file2", " M")
        },
        FileItem {
            has_unstaged_changes: true,
            has_merge_conflicts: true,
            tracked: true,
            ..item("dir1/file3", "UU")
        },
        FileItem {
            has_unstaged_changes: true,
            tracked: true,
            ..item("dir2/dir2/file3", " M")
        },
        FileItem {
            has_unstaged_changes: true,
            ..item("dir2/dir2/file4", "??")
        },
        FileItem {
            has_staged_changes: true,
            tracked: true,
            ..item("dir2/file5", "M ")
        },
        FileItem {
            has_unstaged_changes: true,
            tracked: true,
            ..item("file1", " M")
        },
    ]
}
