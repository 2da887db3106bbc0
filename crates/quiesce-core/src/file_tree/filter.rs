use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::FileItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFilter {
    #[default]
    All,
    Unstaged,
    Staged,
    Tracked,
    Conflicted,
}

pub const ALL_FILTERS: [DisplayFilter; 5] = [
    DisplayFilter::All,
    DisplayFilter::Unstaged,
    DisplayFilter::Staged,
    DisplayFilter::Tracked,
    DisplayFilter::Conflicted,
];

#[derive(Debug, Error)]
#[error(
    "unknown display filter '{value}' (expected one of: all, unstaged, staged, tracked, conflicted)"
)]
pub struct FilterParseError {
    value: String,
}

impl DisplayFilter {
    /// Inline-conflict markers never affect membership; only the merge
    /// conflict flag does.
    pub fn matches(self, item: &FileItem) -> bool {
        match self {
            Self::All => true,
            Self::Unstaged => item.has_unstaged_changes,
            Self::Staged => item.has_staged_changes,
            Self::Tracked => item.tracked,
            Self::Conflicted => item.has_merge_conflicts,
        }
    }

    pub fn apply(self, items: Vec<FileItem>) -> Vec<FileItem> {
        if self == Self::All {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Unstaged,
            Self::Unstaged => Self::Staged,
            Self::Staged => Self::Tracked,
            Self::Tracked => Self::Conflicted,
            Self::Conflicted => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unstaged => "unstaged",
            Self::Staged => "staged",
            Self::Tracked => "tracked",
            Self::Conflicted => "conflicted",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::All => "All files",
            Self::Unstaged => "Unstaged changes",
            Self::Staged => "Staged changes",
            Self::Tracked => "Tracked files",
            Self::Conflicted => "Merge conflicts",
        }
    }
}

impl fmt::Display for DisplayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayFilter {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ALL_FILTERS
            .into_iter()
            .find(|filter| filter.as_str() == normalized)
            .ok_or_else(|| FilterParseError {
                value: value.to_string(),
            })
    }
}
