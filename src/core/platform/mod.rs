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

//! Platform bring-up
//!
//! A [`Platform`] provides the default directory layout derived from the
//! executable location, process-level init/deinit hooks and the
//! [`PlatformProfile`] (bind table plus menu navigation table) the frontend
//! is built with.

pub mod host;
pub mod psp;

pub use host::HostPlatform;
pub use psp::{ExitSignal, PspPlatform};

use super::error::Result;
use super::input::binds::{PlatformBindTable, GENERIC_BINDS, PS3_BINDS};
use super::input::nav::{NavBindTable, CONSOLE_NAV, GENERIC_NAV};
use std::path::{Path, PathBuf};

/// Default directory layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultPaths {
    /// Directory of the executable
    pub port_dir: PathBuf,
    pub core_dir: PathBuf,
    pub savestate_dir: PathBuf,
    pub sram_dir: PathBuf,
    pub system_dir: PathBuf,
    pub filesystem_root_dir: PathBuf,
    pub filebrowser_startup_dir: PathBuf,
    pub input_presets_dir: PathBuf,
    pub border_dir: PathBuf,
    pub menu_border_file: PathBuf,
    pub config_path: PathBuf,
}

impl DefaultPaths {
    /// Layout shared by the console ports: everything hangs off `<port>/cores`
    pub fn from_port_dir(port_dir: PathBuf, filesystem_root: PathBuf) -> Self {
        let core_dir = port_dir.join("cores");
        Self {
            savestate_dir: core_dir.join("savestates"),
            sram_dir: core_dir.join("savefiles"),
            system_dir: core_dir.join("system"),
            filebrowser_startup_dir: filesystem_root.clone(),
            filesystem_root_dir: filesystem_root,
            input_presets_dir: core_dir.join("presets"),
            border_dir: core_dir.join("borders"),
            menu_border_file: core_dir.join("borders").join("Menu").join("main-menu.png"),
            config_path: port_dir.join(CONFIG_FILE),
            core_dir,
            port_dir,
        }
    }
}

/// Config file name inside the port directory
pub const CONFIG_FILE: &str = "rarch.toml";

/// Directory containing `argv0`, or `.` if it has none
pub fn port_dir(argv0: &Path) -> PathBuf {
    match argv0.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Bind and navigation tables for one pad family
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    pub binds: &'static PlatformBindTable,
    pub nav: &'static NavBindTable,
}

impl PlatformProfile {
    /// DualShock pads: analog dpad bind entries, stick navigation
    pub fn ps3() -> Self {
        Self {
            binds: &PS3_BINDS,
            nav: &CONSOLE_NAV,
        }
    }

    /// Digital pads on a console: stick navigation when emulated
    pub fn console() -> Self {
        Self {
            binds: &GENERIC_BINDS,
            nav: &CONSOLE_NAV,
        }
    }

    /// Keyboard or generic gamepad
    pub fn generic() -> Self {
        Self {
            binds: &GENERIC_BINDS,
            nav: &GENERIC_NAV,
        }
    }
}

/// Process-level platform hooks
pub trait Platform {
    fn name(&self) -> &'static str;

    /// Default paths for an executable started as `argv0`
    fn environment_defaults(&self, argv0: &Path) -> DefaultPaths;

    /// Bind and navigation tables for this platform's pads
    fn profile(&self) -> PlatformProfile;

    /// Start platform services
    fn init(&mut self) -> Result<()>;

    /// Stop platform services
    fn deinit(&mut self);

    /// Hand control to another executable on exit, where supported
    fn exitspawn(&mut self) {}
}
