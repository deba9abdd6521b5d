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

//! External collaborators
//!
//! The frontend never runs emulation or touches a display itself. It drives a
//! [`Core`], a [`VideoDriver`] and an
//! [`InputDriver`](crate::core::input::InputDriver) through these traits.

use crate::core::error::Result;
use crate::core::input::{Device, InputDriver, InputSettings};
use crate::core::lifecycle::Command;
use std::path::{Path, PathBuf};

pub use crate::core::browser::archive::{ArchiveExtractor, ZipExtractor};

/// Static information about the loaded core
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreInfo {
    pub library_name: String,
    pub library_version: String,

    /// Pipe-delimited content extensions
    pub valid_extensions: String,
}

/// Arguments for [`Core::init`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadRequest {
    pub config_path: Option<PathBuf>,
    pub sram_path: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub content_path: Option<PathBuf>,
    pub core_path: Option<PathBuf>,
    pub verbose: bool,

    /// Start the core without content
    pub no_content: bool,
}

/// Outcome of one core frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreStatus {
    Running,
    /// The core asked to shut down
    Shutdown,
}

/// Read access to player input for one frame
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    pub driver: &'a dyn InputDriver,
    pub settings: &'a InputSettings,
}

impl FrameInput<'_> {
    /// Whether bind `id` of `port` is held
    pub fn pressed(&self, port: usize, id: usize) -> bool {
        self.driver
            .state(self.settings.binds(port), port, Device::Joypad, 0, id)
            != 0
    }
}

/// Emulation core
pub trait Core {
    fn system_info(&self) -> CoreInfo;

    /// Info for the core at `core_path`, queried before switching cores
    fn query_info(&mut self, core_path: &Path) -> Result<CoreInfo> {
        let _ = core_path;
        Ok(self.system_info())
    }

    /// Load content; `Err(FrontendError::LoadFailed)` on failure
    fn init(&mut self, request: &LoadRequest) -> Result<()>;

    fn deinit(&mut self);

    fn is_initialized(&self) -> bool;

    /// Run one frame
    fn step_frame(&mut self, input: FrameInput<'_>) -> CoreStatus;

    /// Run one frame while paused
    fn step_idle_frame(&mut self) -> CoreStatus;

    /// Handle a hot-key command
    fn handle_command(&mut self, command: Command);

    fn is_paused(&self) -> bool {
        false
    }

    /// Frame advance while paused
    fn is_oneshot(&self) -> bool {
        false
    }
}

/// Video output
pub trait VideoDriver {
    /// Enable or disable vsync-free presentation
    fn set_nonblock_state(&mut self, nonblock: bool);

    fn nonblock_state(&self) -> bool;

    /// False once the window or display is gone
    fn is_alive(&self) -> bool;

    /// Show or hide the fullscreen menu texture
    fn set_texture_enable(&mut self, enable: bool);

    /// Replace the menu texture contents
    fn set_menu_frame(&mut self, lines: &[String]);

    /// Overlay a notification on the next frame
    fn show_message(&mut self, message: &str);

    /// Present the last frame again
    fn render_cached_frame(&mut self);
}
