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

//! Frontend main loop
//!
//! [`Frontend`] owns every piece of frontend state and the driver objects.
//! Each [`Frontend::iterate`] call picks one mode by priority (shutdown,
//! load, game, menu) and runs one step of it:
//!
//! ```text
//!            request_content / history / browser
//!   MENU ────────────────────────────────────────► LOAD_GAME
//!    ▲  │                                            │   │
//!    │  │ resume                            success  │   │ failure
//!    │  ▼                                            ▼   ▼
//!    └── GAME ◄───────────────────────────────────────   policy
//!   menu toggle                                          (menu / exit)
//! ```

pub mod driver;
pub mod headless;
pub mod menu;

pub use driver::{
    ArchiveExtractor, Core, CoreInfo, CoreStatus, FrameInput, LoadRequest, VideoDriver,
    ZipExtractor,
};
pub use menu::{LoadTarget, Menu, MenuAction, MenuView};

use crate::core::browser::ARCHIVE_EXTENSION;
use crate::core::config::{LoadFailurePolicy, Settings};
use crate::core::dir_list::DirectoryLister;
use crate::core::error::{FrontendError, Result};
use crate::core::input::{InputDriver, InputSettings, KeybindAction};
use crate::core::lifecycle::{Command, Lifecycle, Mode, ModeFlags};
use crate::core::message_queue::MessageQueue;
use crate::core::platform::{DefaultPaths, PlatformProfile};
use menu::MenuFrame;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Frames an error notification stays up
const ERROR_MSG_FRAMES: u32 = 180;

/// Frames the load failure notification stays up
const LOAD_FAILED_FRAMES: u32 = 90;

/// Whether a mode keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Stop,
}

/// Process outcome reported by [`Frontend::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitStatus {
    #[default]
    Success,
    /// Content failed to load under [`LoadFailurePolicy::Exit`]
    LoadFailed,
}

impl ExitStatus {
    /// Process exit code
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::LoadFailed => 1,
        }
    }
}

/// Driver objects handed to [`Frontend::new`]
pub struct Drivers {
    pub core: Box<dyn Core>,
    pub video: Box<dyn VideoDriver>,
    pub input: Box<dyn InputDriver>,
    pub lister: Box<dyn DirectoryLister>,
    /// Archive support; without it archives are passed to the core as-is
    pub extractor: Option<Box<dyn ArchiveExtractor>>,
}

/// Frontend context
pub struct Frontend {
    settings: Settings,
    defaults: DefaultPaths,
    lifecycle: Lifecycle,
    messages: MessageQueue,
    input_settings: InputSettings,
    menu: Menu,

    core: Box<dyn Core>,
    video: Box<dyn VideoDriver>,
    input: Box<dyn InputDriver>,
    extractor: Option<Box<dyn ArchiveExtractor>>,

    content_path: Option<PathBuf>,
    /// Archive the current content was extracted from
    archive_source: Option<PathBuf>,
    /// Extracted file waiting to be loaded
    pending_extract: Option<PathBuf>,
    /// Extracted file backing the running content
    loaded_extract: Option<PathBuf>,
    verbose: bool,
    shutdown: bool,
    exit_status: ExitStatus,

    /// Mode whose entry actions have run
    active: Option<Mode>,
    prior_nonblock: bool,
    /// Game waits for menu buttons to be released
    debounce: bool,
}

impl std::fmt::Debug for Frontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontend")
            .field("lifecycle", &self.lifecycle)
            .field("content_path", &self.content_path)
            .field("active", &self.active)
            .field("shutdown", &self.shutdown)
            .field("menu", &self.menu)
            .finish()
    }
}

impl Frontend {
    /// Build the frontend
    ///
    /// No mode is requested yet; call [`Frontend::start`] or one of the
    /// request methods.
    ///
    /// # Errors
    ///
    /// `MenuInit` if the menu cannot be set up.
    pub fn new(
        settings: Settings,
        defaults: DefaultPaths,
        profile: PlatformProfile,
        drivers: Drivers,
    ) -> Result<Self> {
        let Drivers {
            core,
            video,
            mut input,
            lister,
            extractor,
        } = drivers;

        let menu = Menu::init(&settings, &defaults, core.system_info(), lister, profile.nav)?;

        let input_settings =
            InputSettings::with_dpad_modes(profile.binds, &settings.input.dpad_emulation);
        for port in 0..input_settings.players() {
            input.set_dpad_emulation(port, input_settings.dpad_emulation(port));
        }

        let mut lifecycle = Lifecycle::new();
        if settings.info_draw {
            lifecycle.set(ModeFlags::INFO_DRAW);
        }

        log::info!(
            "Frontend ready: core {}, input {}, binds {}",
            menu.info().library_name,
            input.ident(),
            profile.binds.name
        );

        Ok(Self {
            settings,
            defaults,
            lifecycle,
            messages: MessageQueue::default(),
            input_settings,
            menu,
            core,
            video,
            input,
            extractor,
            content_path: None,
            archive_source: None,
            pending_extract: None,
            loaded_extract: None,
            verbose: false,
            shutdown: false,
            exit_status: ExitStatus::Success,
            active: None,
            prior_nonblock: false,
            debounce: false,
        })
    }

    /// Request the first mode: load when content or a content-less start was
    /// asked for, the menu otherwise
    pub fn start(&mut self, content: Option<PathBuf>, no_content: bool) {
        match content {
            Some(path) => self.request_content(path),
            None if no_content => {
                self.discard_pending_extract();
                self.content_path = None;
                self.archive_source = None;
                self.menu.load_no_rom = true;
                self.lifecycle.request_load();
            }
            None => self.lifecycle.request_menu(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn defaults(&self) -> &DefaultPaths {
        &self.defaults
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    pub fn messages(&self) -> &MessageQueue {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageQueue {
        &mut self.messages
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    pub fn input_settings(&self) -> &InputSettings {
        &self.input_settings
    }

    pub fn content_path(&self) -> Option<&Path> {
        self.content_path.as_deref()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Edit a bind and push the resulting dpad policy to the input driver
    pub fn apply_keybind(&mut self, port: usize, id: usize, action: KeybindAction) -> Result<()> {
        self.input_settings.apply(port, id, action)?;
        self.input
            .set_dpad_emulation(port, self.input_settings.dpad_emulation(port));
        Ok(())
    }

    /// Load `path` on the next iteration
    pub fn request_content(&mut self, path: PathBuf) {
        log::debug!("Content requested: {}", path.display());
        self.discard_pending_extract();
        self.content_path = Some(path);
        self.archive_source = None;
        self.menu.load_no_rom = false;
        self.lifecycle.request_load();
    }

    /// Select a history entry's core and content, then request a load
    ///
    /// # Errors
    ///
    /// `HistoryIndex` if `index` is out of range.
    pub fn load_history(&mut self, index: usize) -> Result<()> {
        let entry = match self.menu.history() {
            Some(history) => history.get(index)?.clone(),
            None => return Err(FrontendError::HistoryIndex { index, size: 0 }),
        };

        log::info!("Loading history entry {}: {}", index, entry.label());
        if self.settings.core_path.as_deref() != Some(entry.core_path.as_path()) {
            let info = self.core.query_info(&entry.core_path)?;
            self.menu.set_core_info(info);
        }

        self.discard_pending_extract();
        self.settings.core_path = Some(entry.core_path);
        self.menu.load_no_rom = entry.content.is_none();
        self.content_path = entry.content;
        self.archive_source = None;
        self.lifecycle.request_load();
        Ok(())
    }

    fn open_archive(&mut self, archive: PathBuf) -> Result<()> {
        let Some(extractor) = &self.extractor else {
            self.request_content(archive);
            return Ok(());
        };

        let dest = self
            .settings
            .paths
            .extraction_dir
            .clone()
            .unwrap_or_else(default_extraction_dir);

        let extracted = extractor.extract(&archive, self.menu.extensions(), &dest)?;
        log::info!(
            "Extracted {} from {}",
            extracted.display(),
            archive.display()
        );

        self.request_content(extracted.clone());
        self.archive_source = Some(archive);
        self.pending_extract = Some(extracted);
        Ok(())
    }

    /// Path of the extracted file backing the running content, if any
    pub fn extracted_content(&self) -> Option<&Path> {
        self.loaded_extract.as_deref()
    }

    fn discard_pending_extract(&mut self) {
        if let Some(path) = self.pending_extract.take() {
            remove_extracted(&path);
        }
    }

    /// Deinitialize the running content and delete its extracted file
    fn unload(&mut self) {
        if self.core.is_initialized() {
            self.core.deinit();
        }
        if let Some(path) = self.loaded_extract.take() {
            remove_extracted(&path);
        }
    }

    /// Record history, show the loading notification and redraw once
    pub fn prepare_load(&mut self) {
        self.active = None;

        if self.content_path.is_some() || self.menu.load_no_rom {
            if let Some(content) = &self.content_path {
                if self.lifecycle.contains(ModeFlags::INFO_DRAW) {
                    self.messages
                        .push(format!("INFO - Loading {} ...", base_name(content)), 1, 1);
                }
            }

            let entry = match (&self.archive_source, &self.content_path) {
                (Some(archive), _) => Some(resolve_path(&archive.with_extension(ARCHIVE_EXTENSION))),
                (None, Some(content)) => Some(resolve_path(content)),
                (None, None) => None,
            };
            let core_path = self.settings.core_path.clone().unwrap_or_default();
            let core_name = self.menu.info().library_name.clone();

            if let Some(history) = self.menu.history_mut() {
                history.push(entry.as_deref(), &core_path, &core_name);
            }
        }

        self.menu.reset_input();
        self.menu.msg_force = true;
        self.menu.redraw(self.video.as_mut(), &mut self.messages);
        self.lifecycle.clear(ModeFlags::LOAD_GAME);
    }

    /// Initialize the core with the pending content
    ///
    /// # Returns
    ///
    /// `false` after pushing a failure notification
    pub fn perform_load(&mut self) -> bool {
        self.unload();

        let request = LoadRequest {
            config_path: self.settings.config_path.clone(),
            sram_path: self.settings.paths.savefile_dir.clone(),
            state_path: self.settings.paths.savestate_dir.clone(),
            content_path: self.content_path.clone(),
            core_path: self.settings.core_path.clone(),
            verbose: self.verbose,
            no_content: self.menu.load_no_rom,
        };
        self.menu.load_no_rom = false;

        match self.core.init(&request) {
            Ok(()) => {
                log::info!(
                    "Loaded {}",
                    self.content_path
                        .as_deref()
                        .map_or_else(|| "core without content".to_string(), base_name)
                );
                self.loaded_extract = self.pending_extract.take();
                true
            }
            Err(e) => {
                let name = self
                    .content_path
                    .as_deref()
                    .map_or_else(|| self.menu.info().library_name.clone(), base_name);
                self.discard_pending_extract();
                self.messages
                    .push(format!("Failed to load {}.", name), 1, LOAD_FAILED_FRAMES);
                self.menu.msg_force = true;
                log::error!("Failed to load content: {}", e);
                false
            }
        }
    }

    /// Run one core frame
    pub fn run_game_step(&mut self) -> StepResult {
        if self.active != Some(Mode::Game) {
            self.active = Some(Mode::Game);
            self.debounce = true;
        }

        self.input.poll();

        if self.debounce {
            if !self.menu.nav().read(self.input.as_ref()).is_empty() {
                return StepResult::Continue;
            }
            self.debounce = false;
        }

        self.lifecycle.latch_hotkeys(self.input.hotkeys());
        while let Some(command) = self.lifecycle.pop_command() {
            match command {
                Command::MenuToggle => {
                    log::debug!("Entering menu");
                    self.lifecycle.request_menu();
                    return StepResult::Stop;
                }
                Command::Quit => {
                    log::info!("Quit requested");
                    self.shutdown = true;
                    return StepResult::Stop;
                }
                other => self.core.handle_command(other),
            }
        }

        if !self.core.is_initialized() {
            log::warn!("No content running");
            return StepResult::Stop;
        }

        let status = if self.core.is_paused() && !self.core.is_oneshot() {
            self.core.step_idle_frame()
        } else {
            self.core.step_frame(FrameInput {
                driver: self.input.as_ref(),
                settings: &self.input_settings,
            })
        };

        if let Some(message) = self.messages.pull() {
            self.video.show_message(&message);
        }

        match status {
            CoreStatus::Running => StepResult::Continue,
            CoreStatus::Shutdown => {
                log::info!("Core requested shutdown");
                self.shutdown = true;
                StepResult::Stop
            }
        }
    }

    /// Run one menu frame
    pub fn run_menu_step(&mut self) -> StepResult {
        if self.active != Some(Mode::Menu) {
            self.active = Some(Mode::Menu);
            self.lifecycle.set(ModeFlags::MENU_PREINIT);
            self.prior_nonblock = self.video.nonblock_state();
            self.video.set_nonblock_state(false);
        }

        let core_running = self.core.is_initialized();
        let action = self.menu.iterate(MenuFrame {
            lifecycle: &mut self.lifecycle,
            input: self.input.as_mut(),
            video: self.video.as_mut(),
            messages: &mut self.messages,
            core_running,
        });

        let result = match action {
            MenuAction::Continue => StepResult::Continue,
            MenuAction::Resume => {
                self.lifecycle.request_game();
                StepResult::Stop
            }
            MenuAction::Quit => {
                self.lifecycle.request_game();
                self.lifecycle.push_command(Command::Quit);
                StepResult::Stop
            }
            MenuAction::Load(target) => self.select(target),
        };

        if result == StepResult::Stop {
            self.video.set_nonblock_state(self.prior_nonblock);
        }
        result
    }

    fn select(&mut self, target: LoadTarget) -> StepResult {
        let selected = match target {
            LoadTarget::Content(path) => {
                self.request_content(path);
                Ok(())
            }
            LoadTarget::Archive(path) => self.open_archive(path),
            LoadTarget::History(index) => self.load_history(index),
        };

        match selected {
            Ok(()) => StepResult::Stop,
            Err(e) => {
                log::warn!("Menu: {}", e);
                self.messages
                    .push(format!("ERROR - {}", e), 1, ERROR_MSG_FRAMES);
                StepResult::Continue
            }
        }
    }

    /// Run one scheduler iteration
    ///
    /// # Returns
    ///
    /// The mode that ran
    pub fn iterate(&mut self) -> Mode {
        let mode = self.lifecycle.next_mode(self.shutdown);

        match mode {
            Mode::Terminated => self.lifecycle.terminate(),
            Mode::LoadGame => {
                self.prepare_load();
                if self.perform_load() {
                    self.lifecycle.request_game();
                } else {
                    match self.settings.load_failure {
                        LoadFailurePolicy::ReturnToMenu => self.lifecycle.request_menu(),
                        LoadFailurePolicy::Exit => {
                            self.exit_status = ExitStatus::LoadFailed;
                            self.lifecycle.terminate();
                        }
                    }
                }
                self.lifecycle.clear(ModeFlags::LOAD_GAME);
            }
            Mode::Game => {
                if self.run_game_step() == StepResult::Stop {
                    self.lifecycle.clear(ModeFlags::GAME);
                    self.active = None;
                }
            }
            Mode::Menu => {
                if self.run_menu_step() == StepResult::Stop {
                    self.lifecycle.clear(ModeFlags::MENU);
                    self.active = None;
                }
            }
        }

        mode
    }

    /// Iterate until terminated, then shut down
    pub fn run(&mut self) -> Result<ExitStatus> {
        self.run_for(None)
    }

    /// Like [`Frontend::run`], stopping after `max_iterations` if given
    pub fn run_for(&mut self, max_iterations: Option<u64>) -> Result<ExitStatus> {
        let mut iterations = 0u64;
        while self.iterate() != Mode::Terminated {
            iterations += 1;
            if max_iterations.is_some_and(|max| iterations >= max) {
                log::info!("Stopping after {} iterations", iterations);
                break;
            }
        }

        self.shutdown()?;
        log::info!("Exit status: {:?}", self.exit_status);
        Ok(self.exit_status)
    }

    /// Deinitialize the core, delete extracted content, clear transient state
    /// and save the history
    pub fn shutdown(&mut self) -> Result<()> {
        self.unload();
        self.discard_pending_extract();
        self.lifecycle.reset();
        self.messages.clear();
        self.active = None;

        if let Some(history) = self.menu.history() {
            if let Err(e) = history.save() {
                log::error!("Failed to save history: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Scratch directory for extracted content when none is configured
fn default_extraction_dir() -> PathBuf {
    env::temp_dir().join("rarch-shell")
}

fn remove_extracted(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed extracted {}", path.display()),
        Err(e) => log::warn!("Failed to remove extracted {}: {}", path.display(), e),
    }
}

fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
