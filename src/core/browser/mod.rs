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

//! File browser
//!
//! A cursor over the filtered entries of one directory. The browser commits a
//! new listing only when it is readable and non-empty; any failed navigation
//! leaves the cursor, the path and the entry list exactly as they were.
//!
//! Cursor arithmetic:
//!
//! | Action                | Step          | At the edges |
//! |-----------------------|---------------|--------------|
//! | Up / Down             | 1             | wraps        |
//! | Left / Right          | [`PAGE_STEP`] | clamps       |
//! | ScrollUp / ScrollDown | [`SCROLL_STEP`] | clamps     |
//!
//! # Example
//!
//! ```no_run
//! use rarch_shell::core::browser::{BrowserAction, FileBrowser};
//! use rarch_shell::core::dir_list::{ExtensionFilter, FsLister};
//!
//! let mut browser = FileBrowser::new(
//!     Box::new(FsLister),
//!     "/roms",
//!     ExtensionFilter::parse("nes|zip"),
//! );
//! browser.reset()?;
//! browser.iterate(BrowserAction::Down)?;
//! println!("{:?}", browser.selected());
//! # Ok::<(), rarch_shell::core::error::FrontendError>(())
//! ```

pub mod archive;


use crate::core::dir_list::{sort_entries, DirEntry, DirectoryLister, ExtensionFilter};
use crate::core::error::{FrontendError, Result};
use crate::core::input::NavButtons;
use crate::core::message_queue::MessageQueue;
use std::fmt;
use std::path::{Path, PathBuf};

pub use archive::{ArchiveExtractor, ZipExtractor, ARCHIVE_EXTENSION};

/// Entries skipped by Left / Right
pub const PAGE_STEP: usize = 5;

/// Entries skipped by ScrollUp / ScrollDown
pub const SCROLL_STEP: usize = 19;

/// Message shown when a navigation fails
pub const OPEN_FAILED_MSG: &str = "ERROR - Failed to open directory.";

/// Frames the navigation error stays on screen
pub const OPEN_FAILED_FRAMES: u32 = 180;

/// Browser commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    Up,
    Down,
    Left,
    Right,
    ScrollUp,
    ScrollDown,
    /// Activate the selected entry
    Ok,
    /// Go to the parent directory
    Cancel,
    /// Go back to the root directory
    Reset,
    /// Re-read the current directory
    ResetCurrentDir,
    Noop,
}

/// Result of activating an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Entered a directory
    Directory(PathBuf),
    /// Selected an archive accepted by the filter
    Archive(PathBuf),
    /// Selected a content file
    Content(PathBuf),
}

/// Cursor state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirCursor {
    /// Directory currently listed
    pub directory_path: PathBuf,

    /// Navigation floor
    pub root_dir: PathBuf,

    /// Active extension filter
    pub extensions: ExtensionFilter,

    /// Selected index
    pub ptr: usize,
}

/// Directory browser
pub struct FileBrowser {
    cursor: DirCursor,
    list: Vec<DirEntry>,
    lister: Box<dyn DirectoryLister>,
}

impl fmt::Debug for FileBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBrowser")
            .field("cursor", &self.cursor)
            .field("entries", &self.list.len())
            .finish()
    }
}

impl FileBrowser {
    /// Create a browser rooted at `root`
    ///
    /// Nothing is listed until [`FileBrowser::reset`] or
    /// [`FileBrowser::navigate`] succeeds.
    pub fn new(
        lister: Box<dyn DirectoryLister>,
        root: impl Into<PathBuf>,
        extensions: ExtensionFilter,
    ) -> Self {
        let root = root.into();
        Self {
            cursor: DirCursor {
                directory_path: root.clone(),
                root_dir: root,
                extensions,
                ptr: 0,
            },
            list: Vec::new(),
            lister,
        }
    }

    pub fn cursor(&self) -> &DirCursor {
        &self.cursor
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.list
    }

    pub fn ptr(&self) -> usize {
        self.cursor.ptr
    }

    pub fn directory_path(&self) -> &Path {
        &self.cursor.directory_path
    }

    pub fn root_dir(&self) -> &Path {
        &self.cursor.root_dir
    }

    pub fn extensions(&self) -> &ExtensionFilter {
        &self.cursor.extensions
    }

    /// Entry under the cursor
    pub fn selected(&self) -> Option<&DirEntry> {
        self.list.get(self.cursor.ptr)
    }

    fn read(&self, path: &Path, filter: &ExtensionFilter) -> Result<Vec<DirEntry>> {
        let mut list = self.lister.list(path, filter, true)?;
        if list.is_empty() {
            return Err(FrontendError::EmptyDirectory(path.display().to_string()));
        }
        sort_entries(&mut list);
        Ok(list)
    }

    fn commit(&mut self, path: PathBuf, list: Vec<DirEntry>) {
        log::debug!("Browser: {} ({} entries)", path.display(), list.len());
        self.cursor.directory_path = path;
        self.cursor.ptr = 0;
        self.list = list;
    }

    /// List `path` and make it the current directory
    ///
    /// # Returns
    ///
    /// `EmptyDirectory` or `UnreadableDirectory` without touching the cursor
    pub fn navigate(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let list = self.read(path, &self.cursor.extensions)?;
        self.commit(path.to_path_buf(), list);
        Ok(())
    }

    /// Navigate to the root directory
    pub fn reset(&mut self) -> Result<()> {
        let root = self.cursor.root_dir.clone();
        self.navigate(root)
    }

    /// Re-read the current directory
    pub fn refresh(&mut self) -> Result<()> {
        let current = self.cursor.directory_path.clone();
        self.navigate(current)
    }

    /// Change the root (and optionally the filter), then reset
    ///
    /// Root and filter change only if the new root can be listed.
    pub fn set_root_and_ext(
        &mut self,
        extensions: Option<ExtensionFilter>,
        root: impl Into<PathBuf>,
    ) -> Result<()> {
        let root = root.into();
        let extensions = extensions.unwrap_or_else(|| self.cursor.extensions.clone());

        let list = self.read(&root, &extensions)?;
        self.cursor.root_dir = root.clone();
        self.cursor.extensions = extensions;
        self.commit(root, list);
        Ok(())
    }

    /// Single-step move, wrapping at both ends
    pub fn move_by(&mut self, delta: isize) {
        let len = self.list.len();
        if len == 0 {
            return;
        }

        let len = len as isize;
        let ptr = self.cursor.ptr as isize;
        self.cursor.ptr = (ptr + delta % len).rem_euclid(len) as usize;
    }

    /// Paging move, clamped to the list
    pub fn page(&mut self, delta: isize) {
        let len = self.list.len();
        if len == 0 {
            return;
        }

        self.cursor.ptr = if delta < 0 {
            self.cursor.ptr.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor
                .ptr
                .saturating_add(delta.unsigned_abs())
                .min(len - 1)
        };
    }

    /// Activate the selected entry
    ///
    /// Directories are entered. Zip archives accepted by the filter and plain
    /// files are handed back to the caller.
    pub fn activate(&mut self) -> Result<Activation> {
        let Some(entry) = self.selected().cloned() else {
            let path = self.cursor.directory_path.display().to_string();
            return Err(FrontendError::EmptyDirectory(path));
        };

        if entry.is_directory {
            self.navigate(&entry.path)?;
            return Ok(Activation::Directory(entry.path));
        }

        if is_archive(&entry.path) && self.cursor.extensions.matches(&entry.path) {
            Ok(Activation::Archive(entry.path))
        } else {
            Ok(Activation::Content(entry.path))
        }
    }

    /// Navigate to the parent directory
    ///
    /// No-op at the root or outside it.
    pub fn ascend(&mut self) -> Result<()> {
        let current = &self.cursor.directory_path;
        let root = &self.cursor.root_dir;
        if current == root || !current.starts_with(root) {
            return Ok(());
        }

        match current.parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.navigate(parent)
            }
            None => Ok(()),
        }
    }

    /// Dispatch one browser command
    ///
    /// # Returns
    ///
    /// The activation for [`BrowserAction::Ok`], `None` otherwise
    pub fn iterate(&mut self, action: BrowserAction) -> Result<Option<Activation>> {
        match action {
            BrowserAction::Up => self.move_by(-1),
            BrowserAction::Down => self.move_by(1),
            BrowserAction::Left => self.page(-(PAGE_STEP as isize)),
            BrowserAction::Right => self.page(PAGE_STEP as isize),
            BrowserAction::ScrollUp => self.page(-(SCROLL_STEP as isize)),
            BrowserAction::ScrollDown => self.page(SCROLL_STEP as isize),
            BrowserAction::Ok => return self.activate().map(Some),
            BrowserAction::Cancel => self.ascend()?,
            BrowserAction::Reset => self.reset()?,
            BrowserAction::ResetCurrentDir => self.refresh()?,
            BrowserAction::Noop => {}
        }
        Ok(None)
    }

    /// Handle one frame of menu navigation
    ///
    /// Directions win over confirm/cancel, Start is checked last and resets to
    /// `fs_root` with `extensions`. A failed navigation is reported once on
    /// `messages`.
    ///
    /// # Arguments
    ///
    /// * `nav` - Navigation buttons triggered this frame
    /// * `extensions` - Filter installed on reset
    /// * `fs_root` - Filesystem root used on reset
    /// * `messages` - Notification queue
    pub fn update(
        &mut self,
        nav: NavButtons,
        extensions: &ExtensionFilter,
        fs_root: &Path,
        messages: &mut MessageQueue,
    ) -> Option<Activation> {
        let result = match nav_action(nav) {
            BrowserAction::Noop if nav.contains(NavButtons::START) => self
                .set_root_and_ext(Some(extensions.clone()), fs_root)
                .map(|()| None),
            action => self.iterate(action),
        };

        match result {
            Ok(activation) => activation,
            Err(e) => {
                log::warn!("Browser: {}", e);
                messages.push(OPEN_FAILED_MSG, 1, OPEN_FAILED_FRAMES);
                None
            }
        }
    }
}

fn nav_action(nav: NavButtons) -> BrowserAction {
    const ORDER: [(NavButtons, BrowserAction); 8] = [
        (NavButtons::DOWN, BrowserAction::Down),
        (NavButtons::UP, BrowserAction::Up),
        (NavButtons::RIGHT, BrowserAction::Right),
        (NavButtons::LEFT, BrowserAction::Left),
        (NavButtons::R2, BrowserAction::ScrollDown),
        (NavButtons::L2, BrowserAction::ScrollUp),
        (NavButtons::B, BrowserAction::Ok),
        (NavButtons::A, BrowserAction::Cancel),
    ];

    ORDER
        .iter()
        .find(|(button, _)| nav.contains(*button))
        .map(|&(_, action)| action)
        .unwrap_or(BrowserAction::Noop)
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}
