use quiesce_app::StatusSnapshot;

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct Spinner {
    frame_index: usize,
}

impl Spinner {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    pub(crate) fn frame(&self) -> usize {
        self.frame_index
    }
}

pub fn busy_status(labels: &[String], frame: usize) -> Option<String> {
    let first = labels.first()?;
    let spinner = FRAMES[frame % FRAMES.len()];
    let line = match labels.len() - 1 {
        0 => format!("{spinner} {first}"),
        more => format!("{spinner} {first} (+{more} more)"),
    };
    Some(line)
}

pub(crate) fn status_line(status: &StatusSnapshot, frame: usize) -> Option<String> {
    if let Some(line) = busy_status(&status.pending_labels, frame) {
        return Some(line);
    }
    status
        .busy
        .then(|| format!("{} Refreshing", FRAMES[frame % FRAMES.len()]))
}
