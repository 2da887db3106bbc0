#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use quiesce_app::{App, ItemLoader};
use quiesce_core::Signal;
use quiesce_core::config::QuiesceConfig;
use quiesce_core::file_tree::FileItem;

pub const WAIT: Duration = Duration::from_secs(5);

pub fn item(path: &str, short_status: &str) -> FileItem {
    FileItem {
        path: path.to_string(),
        short_status: short_status.to_string(),
        has_unstaged_changes: true,
        tracked: true,
        ..FileItem::default()
    }
}

pub fn sample_items() -> Vec<FileItem> {
    vec![
        item("dir1/file2", " M"),
        item("dir1/file3", " M"),
        item("dir2/dir2/file3", " M"),
        item("dir2/dir2/file4", " M"),
        FileItem {
            has_unstaged_changes: false,
            has_staged_changes: true,
            ..item("dir2/file5", "M ")
        },
        item("file1", " M"),
    ]
}

#[derive(Default)]
pub struct ScriptedLoader {
    script: Mutex<VecDeque<anyhow::Result<Vec<FileItem>>>>,
    last: Mutex<Vec<FileItem>>,
    gate: Mutex<Option<Signal>>,
    calls: AtomicUsize,
}

impl ScriptedLoader {
    pub fn new(script: Vec<anyhow::Result<Vec<FileItem>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn with_items(items: Vec<FileItem>) -> Self {
        Self::new(vec![Ok(items)])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(anyhow!(message.to_string()))])
    }

    pub fn close_gate(&self) -> Signal {
        let gate = Signal::new();
        *self.gate.lock().expect("gate lock") = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ItemLoader for ScriptedLoader {
    fn load(&self) -> anyhow::Result<Vec<FileItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.wait();
        }

        let next = self.script.lock().expect("script lock").pop_front();
        match next {
            Some(Ok(items)) => {
                *self.last.lock().expect("last lock") = items.clone();
                Ok(items)
            }
            Some(Err(error)) => Err(error),
            None => Ok(self.last.lock().expect("last lock").clone()),
        }
    }
}

pub fn app_with(loader: Arc<ScriptedLoader>) -> App {
    App::new(QuiesceConfig::default(), loader)
}

pub fn visible_paths(app: &App) -> Vec<String> {
    app.tree()
        .snapshot()
        .rows()
        .iter()
        .map(|row| row.path().to_string())
        .collect()
}
