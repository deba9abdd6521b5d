// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Directory listing
//!
//! Filtered, sorted directory listings for the file browser. The browser never
//! touches the filesystem directly; it goes through [`DirectoryLister`] so the
//! menu can be driven from an in-memory tree in tests.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::dir_list::ExtensionFilter;
//!
//! let filter = ExtensionFilter::parse("zip|nes");
//! assert!(filter.matches(std::path::Path::new("mario.NES")));
//! assert!(!filter.matches(std::path::Path::new("notes.txt")));
//! ```

use super::error::{FrontendError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A single entry from a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the entry
    pub path: PathBuf,

    /// True if this entry is a directory
    pub is_directory: bool,
}

impl DirEntry {
    /// Create a file entry
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    /// Create a directory entry
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    /// Last path component, used as the display label
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Pipe-delimited extension filter (e.g. `"zip|nes"`)
///
/// Matching is case-insensitive. An empty filter accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Parse a pipe-delimited extension list
    ///
    /// Empty segments and leading dots are ignored, so `"|.nes||sfc"` yields
    /// `nes` and `sfc`.
    pub fn parse(spec: &str) -> Self {
        let extensions = spec
            .split('|')
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .fold(Vec::new(), |mut acc: Vec<String>, e| {
                if !acc.contains(&e) {
                    acc.push(e);
                }
                acc
            });
        Self { extensions }
    }

    /// True if no extension is configured
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Add an extension if it is not already present
    pub fn push(&mut self, extension: &str) {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if !extension.is_empty() && !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
    }

    /// True if `extension` is part of the filter
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Check whether a file path passes the filter
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.contains(e))
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extensions.join("|"))
    }
}

/// Directory listing collaborator
pub trait DirectoryLister {
    /// List `path`, keeping files accepted by `filter`
    ///
    /// Directories are included only when `include_dirs` is set. The returned
    /// entries are unsorted; callers sort with [`sort_entries`].
    fn list(&self, path: &Path, filter: &ExtensionFilter, include_dirs: bool)
        -> Result<Vec<DirEntry>>;
}

/// [`DirectoryLister`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(
        &self,
        path: &Path,
        filter: &ExtensionFilter,
        include_dirs: bool,
    ) -> Result<Vec<DirEntry>> {
        let unreadable = |source| FrontendError::UnreadableDirectory {
            path: path.display().to_string(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let entry_path = entry.path();

            // Follow symlinks so linked ROM folders show up as directories
            let is_directory = match fs::metadata(&entry_path) {
                Ok(meta) => meta.is_dir(),
                Err(e) => {
                    log::debug!("Skipping {}: {}", entry_path.display(), e);
                    continue;
                }
            };

            if is_directory {
                if include_dirs {
                    entries.push(DirEntry::directory(entry_path));
                }
            } else if filter.matches(&entry_path) {
                entries.push(DirEntry::file(entry_path));
            }
        }

        Ok(entries)
    }
}

/// Sort entries: directories first, then lexicographic by path
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.path.cmp(&b.path),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filter_parse_normalizes() {
        let filter = ExtensionFilter::parse("|.NES||sfc|nes");
        assert_eq!(filter.to_string(), "nes|sfc");
        assert!(filter.contains("SFC"));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = ExtensionFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches(Path::new("readme")));
    }

    #[test]
    fn test_filter_rejects_extensionless_files() {
        let filter = ExtensionFilter::parse("nes");
        assert!(!filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_sort_directories_first() {
        let mut entries = vec![
            DirEntry::file("/roms/b.nes"),
            DirEntry::directory("/roms/zelda"),
            DirEntry::file("/roms/a.nes"),
            DirEntry::directory("/roms/alpha"),
        ];
        sort_entries(&mut entries);

        let names: Vec<String> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["alpha", "zelda", "a.nes", "b.nes"]);
    }

    #[test]
    fn test_fs_lister_filters_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("game.nes"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let filter = ExtensionFilter::parse("nes");
        let mut entries = FsLister.list(dir.path(), &filter, true).unwrap();
        sort_entries(&mut entries);

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory);
        assert_eq!(entries[1].name(), "game.nes");

        let files_only = FsLister.list(dir.path(), &filter, false).unwrap();
        assert_eq!(files_only.len(), 1);
    }

    #[test]
    fn test_fs_lister_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = FsLister
            .list(&missing, &ExtensionFilter::default(), true)
            .unwrap_err();
        assert!(matches!(err, FrontendError::UnreadableDirectory { .. }));
    }
}
