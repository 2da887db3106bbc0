use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::file_tree::FileItem;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid manifest at {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "file")]
    files: Vec<FileItem>,
}

pub fn load_manifest(path: &Path) -> Result<Vec<FileItem>, ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(path, &raw)
}

fn parse_manifest(path: &Path, raw: &str) -> Result<Vec<FileItem>, ManifestError> {
    let manifest: Manifest = toml::from_str(raw).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    for (index, item) in manifest.files.iter().enumerate() {
        if item.path.trim().trim_matches('/').is_empty() {
            return Err(ManifestError::Invalid {
                path: path.to_path_buf(),
                message: format!("file[{index}] path must be non-empty"),
            });
        }
    }

    tracing::debug!(path = %path.display(), files = manifest.files.len(), "manifest loaded");
    Ok(manifest.files)
}
