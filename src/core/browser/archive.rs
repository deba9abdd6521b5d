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

//! Archive extraction for zipped content

use crate::core::dir_list::ExtensionFilter;
use crate::core::error::{FrontendError, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extension of archives the browser treats as virtual directories
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Renamed candidates tried before giving up on a name collision
const MAX_RENAMES: u32 = 1000;

/// Archive extraction collaborator
pub trait ArchiveExtractor {
    /// Extract the first member of `archive` accepted by `filter` into `dest`
    ///
    /// Existing files in `dest` are never overwritten; a colliding name gets
    /// a numeric suffix (`mario-1.nes`).
    ///
    /// # Returns
    ///
    /// Path of the extracted file
    fn extract(&self, archive: &Path, filter: &ExtensionFilter, dest: &Path) -> Result<PathBuf>;
}

/// [`ArchiveExtractor`] for `.zip` files
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, filter: &ExtensionFilter, dest: &Path) -> Result<PathBuf> {
        let zip_err = |e: zip::result::ZipError| {
            FrontendError::Archive(format!("{}: {}", archive.display(), e))
        };

        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(zip_err)?;

        for i in 0..zip.len() {
            let mut member = zip.by_index(i).map_err(zip_err)?;
            if member.is_dir() {
                continue;
            }

            // Rejects absolute paths and `..` components
            let Some(name) = member.enclosed_name() else {
                log::warn!("Skipping unsafe archive member {:?}", member.name());
                continue;
            };

            let nested = name
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
            if nested || !filter.matches(&name) {
                continue;
            }

            let Some(file_name) = name.file_name() else {
                continue;
            };

            fs::create_dir_all(dest)?;
            let (out_path, mut out) = create_unique(dest, Path::new(file_name))?;
            if let Err(e) = io::copy(&mut member, &mut out) {
                drop(out);
                if let Err(rm) = fs::remove_file(&out_path) {
                    log::warn!("Failed to remove {}: {}", out_path.display(), rm);
                }
                return Err(e.into());
            }

            log::info!(
                "Extracted {} from {}",
                out_path.display(),
                archive.display()
            );
            return Ok(out_path);
        }

        Err(FrontendError::Archive(format!(
            "{}: no member matches {}",
            archive.display(),
            filter
        )))
    }
}

/// Create `dest/name`, or `dest/<stem>-N.<ext>` if that is taken
fn create_unique(dest: &Path, name: &Path) -> Result<(PathBuf, File)> {
    let stem = name.file_stem().unwrap_or(name.as_os_str()).to_string_lossy();
    let ext = name.extension().map(|e| e.to_string_lossy());

    for n in 0..=MAX_RENAMES {
        let candidate = match (n, &ext) {
            (0, _) => dest.join(name),
            (_, Some(ext)) => dest.join(format!("{}-{}.{}", stem, n, ext)),
            (_, None) => dest.join(format!("{}-{}", stem, n)),
        };

        match File::options().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(FrontendError::Archive(format!(
        "{}: no free name for {}",
        dest.display(),
        name.display()
    )))
}
