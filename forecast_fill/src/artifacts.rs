//! Locating stored pipelines for reference series
//!
//! The artifacts root holds one subdirectory per reference series, each
//! with a single serialized pipeline. The root is scanned once into an
//! index; lookups then match directory names against the normalized
//! reference identifier.

use crate::error::{FillError, Result};
use crate::models::Pipeline;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of serialized pipeline files
pub const ARTIFACT_EXTENSION: &str = "json";

const PATH_UNSAFE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Drop the trailing character of `identifier`, then strip path-unsafe characters
pub fn normalize_identifier(identifier: &str) -> String {
    let mut chars = identifier.chars();
    chars.next_back();
    chars.filter(|c| !PATH_UNSAFE.contains(c)).collect()
}

/// Strip path-unsafe characters so `name` can be used as a file name
pub fn sanitize_file_name(name: &str) -> String {
    name.chars().filter(|c| !PATH_UNSAFE.contains(c)).collect()
}

#[derive(Debug, Clone)]
struct ArtifactEntry {
    dir_name: String,
    dir: PathBuf,
    files: Vec<PathBuf>,
}

/// A resolved artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactLocation {
    /// Name of the artifact directory
    pub dir_name: String,
    /// Path of the serialized pipeline
    pub path: PathBuf,
}

/// Index of the artifact directories under one root
#[derive(Debug, Clone, Default)]
pub struct ArtifactIndex {
    root: PathBuf,
    entries: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    /// Scan `root` once, recording each subdirectory and its pipeline files
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut entries = Vec::new();

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let dir = entry.path();
            let mut files = Vec::new();
            for file in fs::read_dir(&dir)? {
                let path = file?.path();
                let is_artifact = path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map_or(false, |ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION));
                if is_artifact {
                    files.push(path);
                }
            }
            files.sort();

            entries.push(ArtifactEntry {
                dir_name: entry.file_name().to_string_lossy().into_owned(),
                dir,
                files,
            });
        }
        entries.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));

        info!(root = %root.display(), directories = entries.len(), "indexed artifacts");
        Ok(Self { root, entries })
    }

    /// Get the artifacts root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of artifact directories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the root has no artifact directories
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the pipeline file for a reference identifier.
    ///
    /// A directory named exactly like the normalized identifier wins over
    /// directories that merely contain it; among those the first by name is
    /// used. The chosen directory must hold exactly one pipeline file.
    pub fn locate(&self, identifier: &str) -> Result<ArtifactLocation> {
        let key = normalize_identifier(identifier);

        let entry = self
            .entries
            .iter()
            .find(|e| e.dir_name == key)
            .or_else(|| self.entries.iter().find(|e| e.dir_name.contains(&key)))
            .ok_or_else(|| FillError::ArtifactNotFound {
                identifier: identifier.to_string(),
                reason: format!(
                    "no directory under {} contains '{}'",
                    self.root.display(),
                    key
                ),
            })?;

        match entry.files.as_slice() {
            [path] => {
                debug!(identifier, dir = %entry.dir_name, "resolved artifact");
                Ok(ArtifactLocation {
                    dir_name: entry.dir_name.clone(),
                    path: path.clone(),
                })
            }
            [] => Err(FillError::ArtifactNotFound {
                identifier: identifier.to_string(),
                reason: format!(
                    "directory {} has no .{} file",
                    entry.dir.display(),
                    ARTIFACT_EXTENSION
                ),
            }),
            files => Err(FillError::AmbiguousArtifact {
                dir: entry.dir.clone(),
                count: files.len(),
            }),
        }
    }

    /// Locate and deserialize the pipeline for a reference identifier
    pub fn load(&self, identifier: &str) -> Result<(ArtifactLocation, Pipeline)> {
        let location = self.locate(identifier)?;
        let pipeline = Pipeline::from_file(&location.path)?;
        Ok((location, pipeline))
    }
}
