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

//! Headless drivers
//!
//! Stand-ins for a real display, pad and core, used by the `rarch-shell`
//! binary and the tests.

use super::driver::{Core, CoreInfo, CoreStatus, FrameInput, LoadRequest, VideoDriver};
use crate::core::error::{FrontendError, Result};
use crate::core::input::{Device, InputDriver, Keybind};
use crate::core::lifecycle::{Command, Commands};

/// Video driver that records what it would have shown
#[derive(Debug, Clone)]
pub struct HeadlessVideo {
    alive: bool,
    nonblock: bool,
    texture_enabled: bool,
    frames: u64,
    menu_frame: Vec<String>,
    messages: Vec<String>,
}

impl Default for HeadlessVideo {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessVideo {
    pub fn new() -> Self {
        Self {
            alive: true,
            nonblock: false,
            texture_enabled: false,
            frames: 0,
            menu_frame: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Simulate the output going away
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn texture_enabled(&self) -> bool {
        self.texture_enabled
    }

    /// Last menu texture
    pub fn menu_frame(&self) -> &[String] {
        &self.menu_frame
    }

    /// Every notification shown, oldest first
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl VideoDriver for HeadlessVideo {
    fn set_nonblock_state(&mut self, nonblock: bool) {
        log::trace!("Video: nonblock {}", nonblock);
        self.nonblock = nonblock;
    }

    fn nonblock_state(&self) -> bool {
        self.nonblock
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn set_texture_enable(&mut self, enable: bool) {
        self.texture_enabled = enable;
    }

    fn set_menu_frame(&mut self, lines: &[String]) {
        self.menu_frame = lines.to_vec();
    }

    fn show_message(&mut self, message: &str) {
        if self.messages.last().map(String::as_str) != Some(message) {
            log::info!("{}", message);
        }
        self.messages.push(message.to_string());
    }

    fn render_cached_frame(&mut self) {
        self.frames += 1;
    }
}

/// Input driver with nothing connected
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputDriver for IdleInput {
    fn poll(&mut self) {}

    fn state(&self, _binds: &[Keybind], _port: usize, _device: Device, _index: usize, _id: usize) -> i16 {
        0
    }

    fn hotkeys(&self) -> Commands {
        Commands::empty()
    }

    fn ident(&self) -> &'static str {
        "null"
    }
}

/// Core that runs a fixed number of frames, then asks to shut down
#[derive(Debug, Clone)]
pub struct FrameBudgetCore {
    info: CoreInfo,
    budget: u64,
    frames: u64,
    initialized: bool,
    commands: Vec<Command>,
}

impl FrameBudgetCore {
    /// Core that accepts `extensions` and shuts down after `budget` frames
    pub fn new(budget: u64, extensions: &str) -> Self {
        Self {
            info: CoreInfo {
                library_name: "Frame Budget".to_string(),
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                valid_extensions: extensions.to_string(),
            },
            budget,
            frames: 0,
            initialized: false,
            commands: Vec::new(),
        }
    }

    /// Frames run since the last load
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Hot-key commands received
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn advance(&mut self) -> CoreStatus {
        self.frames += 1;
        if self.frames >= self.budget {
            log::info!("Frame budget of {} reached", self.budget);
            CoreStatus::Shutdown
        } else {
            CoreStatus::Running
        }
    }
}

impl Core for FrameBudgetCore {
    fn system_info(&self) -> CoreInfo {
        self.info.clone()
    }

    fn init(&mut self, request: &LoadRequest) -> Result<()> {
        if let Some(content) = &request.content_path {
            if !content.is_file() {
                return Err(FrontendError::LoadFailed(format!(
                    "{} is not a file",
                    content.display()
                )));
            }
            log::info!("Loaded {}", content.display());
        } else if !request.no_content {
            return Err(FrontendError::LoadFailed("no content given".to_string()));
        }

        self.frames = 0;
        self.initialized = true;
        Ok(())
    }

    fn deinit(&mut self) {
        if self.initialized {
            log::debug!("Core deinitialized after {} frames", self.frames);
        }
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn step_frame(&mut self, _input: FrameInput<'_>) -> CoreStatus {
        self.advance()
    }

    fn step_idle_frame(&mut self) -> CoreStatus {
        self.advance()
    }

    fn handle_command(&mut self, command: Command) {
        log::debug!("Core command: {:?}", command);
        self.commands.push(command);
    }
}
