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

//! Recently played content
//!
//! Bounded, most-recent-first list of `(content, core path, core name)`
//! records, persisted as a flat text file with three lines per record:
//!
//! ```text
//! /roms/nes/mario.nes
//! /cores/nestopia_libretro.so
//! Nestopia
//! ```
//!
//! An empty content line stands for a core started without content.

use super::error::{FrontendError, Result};
use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default history file name, resolved against the config directory
pub const DEFAULT_HISTORY_FILE: &str = ".rarch-game-history.txt";

/// One history record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Content path, `None` for a core started without content
    pub content: Option<PathBuf>,

    /// Core library path
    pub core_path: PathBuf,

    /// Core display name
    pub core_name: String,
}

impl HistoryEntry {
    /// Label shown in the history menu
    pub fn label(&self) -> String {
        let content = self
            .content
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No Content".to_string());
        format!("{} ({})", content, self.core_name)
    }
}

/// Most-recent-first content history
#[derive(Debug, Clone)]
pub struct RomHistory {
    path: PathBuf,
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl RomHistory {
    /// Open a history file
    ///
    /// A missing file yields an empty history. Records beyond `capacity` are
    /// dropped and a trailing partial record is ignored.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        let mut history = Self {
            path,
            capacity,
            entries: VecDeque::new(),
        };

        let text = match fs::read_to_string(&history.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No history at {}, starting empty", history.path.display());
                return Ok(history);
            }
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<&str> = text.lines().collect();
        let mut records = lines.chunks_exact(3);
        for record in records.by_ref() {
            if history.entries.len() >= capacity {
                break;
            }
            let content = (!record[0].is_empty()).then(|| PathBuf::from(record[0]));
            history.entries.push_back(HistoryEntry {
                content,
                core_path: PathBuf::from(record[1]),
                core_name: record[2].to_string(),
            });
        }

        if !records.remainder().is_empty() {
            log::warn!(
                "Ignoring partial record at the end of {}",
                history.path.display()
            );
        }

        log::debug!(
            "Loaded {} history entries from {}",
            history.entries.len(),
            history.path.display()
        );
        Ok(history)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Record a launch
    ///
    /// An existing `(content, core_path)` pair moves to the front; otherwise
    /// the oldest entry is evicted once the history is full. Entries whose
    /// paths or name contain a line break are refused.
    pub fn push(&mut self, content: Option<&Path>, core_path: &Path, core_name: &str) {
        if self.capacity == 0 {
            return;
        }

        // Records are line based
        let breaks_line = |text: &str| text.contains(['\n', '\r']);
        if content.is_some_and(|c| breaks_line(&*c.to_string_lossy()))
            || breaks_line(&*core_path.to_string_lossy())
            || breaks_line(core_name)
        {
            log::warn!("Not recording history entry with a line break: {:?}", content);
            return;
        }

        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.content.as_deref() == content && e.core_path == core_path)
        {
            if let Some(mut entry) = self.entries.remove(pos) {
                entry.core_name = core_name.to_string();
                self.entries.push_front(entry);
            }
            return;
        }

        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }

        self.entries.push_front(HistoryEntry {
            content: content.map(Path::to_path_buf),
            core_path: core_path.to_path_buf(),
            core_name: core_name.to_string(),
        });
    }

    /// Entry at `index` (0 = most recent)
    pub fn get(&self, index: usize) -> Result<&HistoryEntry> {
        self.entries.get(index).ok_or(FrontendError::HistoryIndex {
            index,
            size: self.entries.len(),
        })
    }

    /// Write the history file
    pub fn save(&self) -> Result<()> {
        let mut text = String::new();
        for entry in &self.entries {
            if let Some(content) = &entry.content {
                text.push_str(&content.to_string_lossy());
            }
            text.push('\n');
            text.push_str(&entry.core_path.to_string_lossy());
            text.push('\n');
            text.push_str(&entry.core_name);
            text.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)?;
        log::debug!("Saved history to {}", self.path.display());
        Ok(())
    }
}
