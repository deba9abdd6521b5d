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

//! Test fixtures: scripted drivers and a frontend harness
//!
//! Every fake keeps its state behind an `Rc<RefCell<_>>` handle so a test
//! can drive and inspect it after the frontend has taken ownership.

use rarch_shell::core::config::Settings;
use rarch_shell::core::dir_list::FsLister;
use rarch_shell::core::error::{FrontendError, Result};
use rarch_shell::core::input::{
    bind_pressed, derive_hotkeys, Device, DpadEmulation, InputDriver, Keybind, RetroPad,
};
use rarch_shell::core::lifecycle::{Command, Commands};
use rarch_shell::core::platform::{DefaultPaths, PlatformProfile};
use rarch_shell::frontend::headless::HeadlessVideo;
use rarch_shell::frontend::{
    Core, CoreInfo, CoreStatus, Drivers, FrameInput, Frontend, LoadRequest, VideoDriver,
    ZipExtractor,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// What the fake pad reports on the next poll
#[derive(Debug, Default)]
pub struct PadState {
    pub held: RetroPad,
    /// Hot keys reported on top of the derived ones
    pub extra_hotkeys: Commands,
    pub polls: usize,
}

/// Test-side handle to a [`FakeInput`]
#[derive(Debug, Clone, Default)]
pub struct PadHandle(Rc<RefCell<PadState>>);

#[allow(dead_code)]
impl PadHandle {
    pub fn hold(&self, buttons: RetroPad) {
        self.0.borrow_mut().held = buttons;
    }

    pub fn release(&self) {
        let mut state = self.0.borrow_mut();
        state.held = RetroPad::empty();
        state.extra_hotkeys = Commands::empty();
    }

    pub fn hold_hotkeys(&self, hotkeys: Commands) {
        self.0.borrow_mut().extra_hotkeys = hotkeys;
    }

    pub fn polls(&self) -> usize {
        self.0.borrow().polls
    }
}

/// Single-pad input driver fed from a [`PadHandle`]
pub struct FakeInput {
    handle: PadHandle,
    state: RetroPad,
    hotkeys: Commands,
}

impl FakeInput {
    pub fn new(handle: PadHandle) -> Self {
        Self {
            handle,
            state: RetroPad::empty(),
            hotkeys: Commands::empty(),
        }
    }
}

impl InputDriver for FakeInput {
    fn poll(&mut self) {
        let mut pad = self.handle.0.borrow_mut();
        pad.polls += 1;
        self.state = pad.held;
        self.hotkeys = derive_hotkeys(pad.held, DpadEmulation::None) | pad.extra_hotkeys;
    }

    fn state(&self, binds: &[Keybind], port: usize, device: Device, _index: usize, id: usize) -> i16 {
        if port != 0 || device != Device::Joypad {
            return 0;
        }
        i16::from(bind_pressed(binds, id, self.state))
    }

    fn hotkeys(&self) -> Commands {
        self.hotkeys
    }

    fn ident(&self) -> &'static str {
        "fake"
    }
}

/// Observable state of a [`FakeCore`]
#[derive(Debug, Default)]
pub struct CoreState {
    pub fail_loads: bool,
    /// Shut down after this many frames
    pub budget: Option<u64>,
    pub initialized: bool,
    pub frames: u64,
    pub requests: Vec<LoadRequest>,
    pub commands: Vec<Command>,
    pub deinits: usize,
}

/// Test-side handle to a [`FakeCore`]
#[derive(Debug, Clone, Default)]
pub struct CoreHandle(Rc<RefCell<CoreState>>);

#[allow(dead_code)]
impl CoreHandle {
    pub fn state(&self) -> std::cell::Ref<'_, CoreState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<'_, CoreState> {
        self.0.borrow_mut()
    }
}

pub struct FakeCore {
    handle: CoreHandle,
    extensions: String,
}

impl Core for FakeCore {
    fn system_info(&self) -> CoreInfo {
        CoreInfo {
            library_name: "Fake".to_string(),
            library_version: "1.0".to_string(),
            valid_extensions: self.extensions.clone(),
        }
    }

    /// Names other cores after their file stem
    fn query_info(&mut self, core_path: &Path) -> Result<CoreInfo> {
        let name = core_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| FrontendError::LoadFailed(core_path.display().to_string()))?;
        Ok(CoreInfo {
            library_name: name,
            library_version: "1.0".to_string(),
            valid_extensions: "md".to_string(),
        })
    }

    fn init(&mut self, request: &LoadRequest) -> Result<()> {
        let mut state = self.handle.0.borrow_mut();
        state.requests.push(request.clone());
        if state.fail_loads {
            return Err(FrontendError::LoadFailed("scripted failure".to_string()));
        }
        state.initialized = true;
        state.frames = 0;
        Ok(())
    }

    fn deinit(&mut self) {
        let mut state = self.handle.0.borrow_mut();
        state.initialized = false;
        state.deinits += 1;
    }

    fn is_initialized(&self) -> bool {
        self.handle.0.borrow().initialized
    }

    fn step_frame(&mut self, _input: FrameInput<'_>) -> CoreStatus {
        self.step_idle_frame()
    }

    fn step_idle_frame(&mut self) -> CoreStatus {
        let mut state = self.handle.0.borrow_mut();
        state.frames += 1;
        match state.budget {
            Some(budget) if state.frames >= budget => CoreStatus::Shutdown,
            _ => CoreStatus::Running,
        }
    }

    fn handle_command(&mut self, command: Command) {
        self.handle.0.borrow_mut().commands.push(command);
    }
}

/// Test-side handle to a shared [`HeadlessVideo`]
#[derive(Debug, Clone, Default)]
pub struct VideoHandle(Rc<RefCell<HeadlessVideo>>);

#[allow(dead_code)]
impl VideoHandle {
    pub fn video(&self) -> std::cell::Ref<'_, HeadlessVideo> {
        self.0.borrow()
    }

    pub fn video_mut(&self) -> std::cell::RefMut<'_, HeadlessVideo> {
        self.0.borrow_mut()
    }
}

impl VideoDriver for VideoHandle {
    fn set_nonblock_state(&mut self, nonblock: bool) {
        self.0.borrow_mut().set_nonblock_state(nonblock);
    }

    fn nonblock_state(&self) -> bool {
        self.0.borrow().nonblock_state()
    }

    fn is_alive(&self) -> bool {
        self.0.borrow().is_alive()
    }

    fn set_texture_enable(&mut self, enable: bool) {
        self.0.borrow_mut().set_texture_enable(enable);
    }

    fn set_menu_frame(&mut self, lines: &[String]) {
        self.0.borrow_mut().set_menu_frame(lines);
    }

    fn show_message(&mut self, message: &str) {
        self.0.borrow_mut().show_message(message);
    }

    fn render_cached_frame(&mut self) {
        self.0.borrow_mut().render_cached_frame();
    }
}

/// A frontend wired to fakes over a temporary ROM directory
pub struct Harness {
    pub dir: TempDir,
    pub frontend: Frontend,
    pub pad: PadHandle,
    pub core: CoreHandle,
    pub video: VideoHandle,
}

#[allow(dead_code)]
impl Harness {
    /// Harness over `files` (created empty), with `configure` applied to the
    /// settings before the frontend is built
    pub fn new(files: &[&str], configure: impl FnOnce(&mut Settings)) -> Self {
        let dir = TempDir::new().unwrap();
        for name in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            if name.ends_with('/') {
                fs::create_dir_all(&path).unwrap();
            } else {
                fs::write(&path, b"rom").unwrap();
            }
        }

        let mut settings = Settings::default();
        settings.browser_directory = Some(dir.path().to_path_buf());
        settings.history.path = Some(dir.path().join("history.txt"));
        settings.core_path = Some(PathBuf::from("/cores/fake_libretro.so"));
        configure(&mut settings);

        let pad = PadHandle::default();
        let core = CoreHandle::default();
        let video = VideoHandle::default();

        let drivers = Drivers {
            core: Box::new(FakeCore {
                handle: core.clone(),
                extensions: "nes|sfc".to_string(),
            }),
            video: Box::new(video.clone()),
            input: Box::new(FakeInput::new(pad.clone())),
            lister: Box::new(FsLister),
            extractor: Some(Box::new(ZipExtractor)),
        };

        let mut frontend = Frontend::new(
            settings,
            DefaultPaths::default(),
            PlatformProfile::generic(),
            drivers,
        )
        .unwrap();
        frontend.menu_mut().set_throttle(false);

        Self {
            dir,
            frontend,
            pad,
            core,
            video,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run `count` iterations
    pub fn iterate_n(&mut self, count: usize) {
        for _ in 0..count {
            self.frontend.iterate();
        }
    }

    /// Press and release buttons in the menu (two iterations)
    pub fn tap(&mut self, buttons: RetroPad) {
        self.pad.hold(buttons);
        self.frontend.iterate();
        self.pad.release();
        self.frontend.iterate();
    }
}

/// Write a zip archive containing `members`
#[allow(dead_code)]
pub fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    use std::io::Write;

    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}
