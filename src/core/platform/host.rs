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

//! Desktop host platform

use super::{port_dir, DefaultPaths, Platform, PlatformProfile, CONFIG_FILE};
use crate::core::error::Result;
use std::path::{Path, PathBuf};

/// Desktop platform: paths next to the executable, no platform services
#[derive(Debug, Clone, Copy)]
pub struct HostPlatform {
    profile: PlatformProfile,
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPlatform {
    pub fn new() -> Self {
        Self::with_profile(PlatformProfile::generic())
    }

    /// Host platform driving a specific pad family
    pub fn with_profile(profile: PlatformProfile) -> Self {
        Self { profile }
    }
}

impl Platform for HostPlatform {
    fn name(&self) -> &'static str {
        "host"
    }

    fn environment_defaults(&self, argv0: &Path) -> DefaultPaths {
        let port_dir = port_dir(argv0);
        let root = if cfg!(windows) {
            PathBuf::from("C:\\")
        } else {
            PathBuf::from("/")
        };

        DefaultPaths {
            core_dir: port_dir.join("cores"),
            savestate_dir: port_dir.join("savestates"),
            sram_dir: port_dir.join("savefiles"),
            system_dir: port_dir.join("system"),
            filebrowser_startup_dir: port_dir.clone(),
            filesystem_root_dir: root,
            input_presets_dir: port_dir.join("presets"),
            border_dir: port_dir.join("borders"),
            menu_border_file: port_dir.join("borders").join("Menu").join("main-menu.png"),
            config_path: port_dir.join(CONFIG_FILE),
            port_dir,
        }
    }

    fn profile(&self) -> PlatformProfile {
        self.profile
    }

    fn init(&mut self) -> Result<()> {
        log::debug!("Host platform initialized");
        Ok(())
    }

    fn deinit(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_next_to_executable() {
        let paths = HostPlatform::new().environment_defaults(Path::new("/opt/rarch/rarch-shell"));

        assert_eq!(paths.port_dir, PathBuf::from("/opt/rarch"));
        assert_eq!(paths.savestate_dir, PathBuf::from("/opt/rarch/savestates"));
        assert_eq!(paths.filebrowser_startup_dir, PathBuf::from("/opt/rarch"));
        assert_eq!(paths.config_path, PathBuf::from("/opt/rarch/rarch.toml"));
    }

    #[test]
    fn test_profile_injection() {
        let platform = HostPlatform::with_profile(PlatformProfile::ps3());
        assert_eq!(platform.profile().binds.name, "ps3");
        assert_eq!(HostPlatform::new().profile().binds.name, "generic");
    }
}
