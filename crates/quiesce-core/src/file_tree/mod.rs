mod filter;
mod item;
mod node;
mod snapshot;
mod view_model;

pub use filter::{ALL_FILTERS, DisplayFilter, FilterParseError};
pub use item::{FileItem, ItemSource, SharedItems};
pub use node::{FileNode, NodeKind, ROOT_PATH, TreeOptions, build_tree};
pub use snapshot::{TreeRow, TreeSnapshot};
pub use view_model::{FileTreeViewModel, Selection};
