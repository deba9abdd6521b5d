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

//! Menu state machine
//!
//! One [`Menu::iterate`] call is one menu frame: poll input, turn newly
//! pressed (or auto-repeated) navigation buttons into browser or history
//! actions, draw the visible rows through the ticker and throttle to the menu
//! frame budget.
//!
//! # Held-button repeat
//!
//! A held direction fires once on press, again after 12 frames and then every
//! 6 frames until released.


use crate::core::browser::{Activation, FileBrowser, ARCHIVE_EXTENSION};
use crate::core::config::Settings;
use crate::core::dir_list::{DirectoryLister, ExtensionFilter};
use crate::core::error::{FrontendError, Result};
use crate::core::history::RomHistory;
use crate::core::input::{InputDriver, NavBindTable, NavButtons};
use crate::core::lifecycle::{Commands, Lifecycle, ModeFlags};
use crate::core::message_queue::MessageQueue;
use crate::core::platform::DefaultPaths;
use crate::core::ticker::Ticker;
use crate::frontend::driver::{CoreInfo, VideoDriver};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// Frames before a held direction first repeats
pub const INITIAL_REPEAT_DELAY: u32 = 12;

/// Frames between subsequent repeats
pub const REPEAT_DELAY: u32 = 6;

/// Visible entry rows
pub const MENU_ROWS: usize = 16;

/// Label field width in characters
pub const LABEL_WIDTH: usize = 40;

/// Which list the menu shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuView {
    Browser,
    History,
}

/// Content selected in the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    Content(PathBuf),
    Archive(PathBuf),
    /// Index into the history list
    History(usize),
}

/// Result of one menu frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Stay in the menu
    Continue,
    /// Go back to the running content
    Resume,
    /// Quit key pressed or the video output is gone
    Quit,
    Load(LoadTarget),
}

/// Collaborators borrowed for one menu frame
pub struct MenuFrame<'a> {
    pub lifecycle: &'a mut Lifecycle,
    pub input: &'a mut dyn InputDriver,
    pub video: &'a mut dyn VideoDriver,
    pub messages: &'a mut MessageQueue,
    /// Content is loaded and can be resumed
    pub core_running: bool,
}

/// Menu state
pub struct Menu {
    trigger_state: NavButtons,
    old_input_state: NavButtons,
    do_held: bool,
    first_held: bool,
    initial_held: bool,
    delay_timer: u32,
    delay_count: u32,

    need_refresh: bool,
    /// Show the pending notification on the next redraw
    pub msg_force: bool,
    /// Show the core's last frame behind the menu
    pub frame_buf_show: bool,
    /// Next load starts the core without content
    pub load_no_rom: bool,

    info: CoreInfo,
    extensions: ExtensionFilter,
    fs_root: PathBuf,
    browser: FileBrowser,
    history: Option<RomHistory>,
    view: MenuView,
    history_ptr: usize,
    ticker: Ticker,
    nav: &'static NavBindTable,

    budget_ms: f64,
    throttle: bool,
    last_time: Instant,
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("view", &self.view)
            .field("browser", &self.browser)
            .field("history", &self.history.as_ref().map(RomHistory::len))
            .field("trigger_state", &self.trigger_state)
            .finish()
    }
}

impl Menu {
    /// Build the menu for a core
    ///
    /// # Errors
    ///
    /// `MenuInit` if the history file cannot be opened.
    pub fn init(
        settings: &Settings,
        defaults: &DefaultPaths,
        info: CoreInfo,
        lister: Box<dyn DirectoryLister>,
        nav: &'static NavBindTable,
    ) -> Result<Self> {
        let extensions = browser_extensions(&info);

        let root = settings
            .browser_directory
            .clone()
            .unwrap_or_else(|| defaults.filebrowser_startup_dir.clone());

        let mut browser = FileBrowser::new(lister, root, extensions.clone());
        if let Err(e) = browser.reset() {
            log::warn!("Menu: initial directory unavailable: {}", e);
        }

        let history_path = settings.history_path();
        let history = RomHistory::open(&history_path, settings.history.size).map_err(|e| {
            FrontendError::MenuInit(format!(
                "cannot open history {}: {}",
                history_path.display(),
                e
            ))
        })?;

        log::info!(
            "Menu initialized for {} (extensions: {})",
            info.library_name,
            extensions
        );

        Ok(Self {
            trigger_state: NavButtons::empty(),
            old_input_state: NavButtons::empty(),
            do_held: false,
            first_held: false,
            initial_held: true,
            delay_timer: 0,
            delay_count: 0,
            need_refresh: true,
            msg_force: false,
            frame_buf_show: true,
            load_no_rom: false,
            info,
            extensions,
            fs_root: defaults.filesystem_root_dir.clone(),
            browser,
            history: Some(history),
            view: MenuView::Browser,
            history_ptr: 0,
            ticker: Ticker::new(),
            nav,
            budget_ms: settings.menu_frame_budget_ms(),
            throttle: true,
            last_time: Instant::now(),
        })
    }

    pub fn info(&self) -> &CoreInfo {
        &self.info
    }

    pub fn extensions(&self) -> &ExtensionFilter {
        &self.extensions
    }

    /// Switch to another core's info and re-filter the browser
    pub fn set_core_info(&mut self, info: CoreInfo) {
        let extensions = browser_extensions(&info);
        let root = self.browser.root_dir().to_path_buf();
        if let Err(e) = self.browser.set_root_and_ext(Some(extensions.clone()), root) {
            log::warn!("Menu: cannot re-filter browser: {}", e);
        }

        log::info!(
            "Menu switched to {} (extensions: {})",
            info.library_name,
            extensions
        );
        self.info = info;
        self.extensions = extensions;
        self.need_refresh = true;
    }

    pub fn nav(&self) -> &'static NavBindTable {
        self.nav
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut FileBrowser {
        &mut self.browser
    }

    pub fn history(&self) -> Option<&RomHistory> {
        self.history.as_ref()
    }

    pub fn history_mut(&mut self) -> Option<&mut RomHistory> {
        self.history.as_mut()
    }

    pub fn view(&self) -> MenuView {
        self.view
    }

    pub fn history_ptr(&self) -> usize {
        self.history_ptr
    }

    /// Buttons that fired this frame
    pub fn trigger_state(&self) -> NavButtons {
        self.trigger_state
    }

    /// Enable or disable the frame-rate throttle
    pub fn set_throttle(&mut self, enabled: bool) {
        self.throttle = enabled;
    }

    /// Forget held buttons and pending repeats
    pub fn reset_input(&mut self) {
        self.old_input_state = NavButtons::empty();
        self.trigger_state = NavButtons::empty();
        self.do_held = false;
        self.first_held = false;
        self.initial_held = true;
    }

    /// Run one menu frame
    pub fn iterate(&mut self, frame: MenuFrame<'_>) -> MenuAction {
        if frame.lifecycle.contains(ModeFlags::MENU_PREINIT) {
            self.need_refresh = true;
            frame.lifecycle.clear(ModeFlags::MENU_PREINIT);
            // Buttons still held from the game must be released first
            self.old_input_state |= NavButtons::MENU;
        }

        frame.input.poll();
        if frame.input.key_pressed(Commands::QUIT) || !frame.video.is_alive() {
            log::info!("Menu: quit requested");
            return MenuAction::Quit;
        }

        let input_state = self.nav.read(&*frame.input);
        self.update_trigger(input_state);

        let action = self.dispatch(frame.messages);

        self.draw(frame.video, frame.messages);
        self.throttle();
        frame.video.set_texture_enable(false);

        // A selection made this frame wins over the resume combo
        if action == MenuAction::Continue
            && self.trigger_state.contains(NavButtons::MENU)
            && frame.core_running
        {
            log::debug!("Menu: resuming content");
            return MenuAction::Resume;
        }

        action
    }

    /// Draw one frame without reading input
    pub fn redraw(&mut self, video: &mut dyn VideoDriver, messages: &mut MessageQueue) {
        self.draw(video, messages);
        video.set_texture_enable(false);
    }

    fn update_trigger(&mut self, input_state: NavButtons) {
        self.trigger_state = input_state & !self.old_input_state;
        self.do_held = input_state.intersects(NavButtons::REPEATING)
            && !input_state.contains(NavButtons::MENU);

        if self.do_held {
            if !self.first_held {
                self.first_held = true;
                self.delay_timer = if self.initial_held {
                    INITIAL_REPEAT_DELAY
                } else {
                    REPEAT_DELAY
                };
                self.delay_count = 0;
            }

            if self.delay_count >= self.delay_timer {
                self.first_held = false;
                self.trigger_state = input_state;
            }

            self.initial_held = false;
        } else {
            self.first_held = false;
            self.initial_held = true;
        }

        self.delay_count += 1;
        self.old_input_state = input_state;
    }

    fn dispatch(&mut self, messages: &mut MessageQueue) -> MenuAction {
        let trigger = self.trigger_state;
        if trigger.is_empty() {
            return MenuAction::Continue;
        }
        self.need_refresh = true;

        if trigger.contains(NavButtons::SELECT) && self.history.is_some() {
            self.view = match self.view {
                MenuView::Browser => MenuView::History,
                MenuView::History => MenuView::Browser,
            };
            self.history_ptr = 0;
            return MenuAction::Continue;
        }

        match self.view {
            MenuView::Browser => {
                match self
                    .browser
                    .update(trigger, &self.extensions, &self.fs_root, messages)
                {
                    Some(Activation::Content(path)) => MenuAction::Load(LoadTarget::Content(path)),
                    Some(Activation::Archive(path)) => MenuAction::Load(LoadTarget::Archive(path)),
                    Some(Activation::Directory(_)) | None => MenuAction::Continue,
                }
            }
            MenuView::History => self.dispatch_history(trigger),
        }
    }

    fn dispatch_history(&mut self, trigger: NavButtons) -> MenuAction {
        let len = self.history.as_ref().map_or(0, RomHistory::len);

        if trigger.contains(NavButtons::A) {
            self.view = MenuView::Browser;
            return MenuAction::Continue;
        }
        if len == 0 {
            return MenuAction::Continue;
        }

        if trigger.contains(NavButtons::DOWN) {
            self.history_ptr = (self.history_ptr + 1) % len;
        } else if trigger.contains(NavButtons::UP) {
            self.history_ptr = (self.history_ptr + len - 1) % len;
        } else if trigger.contains(NavButtons::B) {
            return MenuAction::Load(LoadTarget::History(self.history_ptr));
        }

        MenuAction::Continue
    }

    /// Text rows of the current view
    pub fn lines(&self) -> Vec<String> {
        let (title, labels, ptr) = match self.view {
            MenuView::Browser => (
                format!("FILE BROWSER {}", self.browser.directory_path().display()),
                self.browser
                    .entries()
                    .iter()
                    .map(|e| {
                        if e.is_directory {
                            format!("{}/", e.name())
                        } else {
                            e.name()
                        }
                    })
                    .collect::<Vec<_>>(),
                self.browser.ptr(),
            ),
            MenuView::History => (
                "LOAD HISTORY".to_string(),
                self.history
                    .iter()
                    .flat_map(|h| h.iter())
                    .map(|e| e.label())
                    .collect(),
                self.history_ptr,
            ),
        };

        let start = ptr
            .saturating_sub(MENU_ROWS / 2)
            .min(labels.len().saturating_sub(MENU_ROWS));

        let mut lines = Vec::with_capacity(MENU_ROWS + 1);
        lines.push(self.ticker.line(&title, LABEL_WIDTH + 2, false));
        for (i, label) in labels.iter().enumerate().skip(start).take(MENU_ROWS) {
            let selected = i == ptr;
            let marker = if selected { '>' } else { ' ' };
            lines.push(format!(
                "{} {}",
                marker,
                self.ticker.line(label, LABEL_WIDTH, selected)
            ));
        }
        lines
    }

    fn draw(&mut self, video: &mut dyn VideoDriver, messages: &mut MessageQueue) {
        if self.need_refresh {
            self.ticker = Ticker::new();
            self.need_refresh = false;
        }

        video.set_texture_enable(self.frame_buf_show);
        video.set_menu_frame(&self.lines());
        if let Some(message) = messages.pull() {
            video.show_message(&message);
        } else if self.msg_force {
            log::trace!("Menu: forced message redraw with empty queue");
        }
        video.render_cached_frame();

        self.msg_force = false;
        self.ticker.tick();
    }

    fn throttle(&mut self) {
        if self.throttle {
            if let Some(sleep) = throttle_sleep(self.budget_ms, self.last_time.elapsed()) {
                thread::sleep(sleep);
            }
        }
        self.last_time = Instant::now();
    }
}

/// Core extensions plus archives, or everything when the core names none
fn browser_extensions(info: &CoreInfo) -> ExtensionFilter {
    let mut extensions = ExtensionFilter::parse(&info.valid_extensions);
    if !extensions.is_empty() {
        extensions.push(ARCHIVE_EXTENSION);
    }
    extensions
}

/// Time left in a frame budget of `budget_ms` after `elapsed`
///
/// `None` when the budget is already spent.
pub fn throttle_sleep(budget_ms: f64, elapsed: Duration) -> Option<Duration> {
    let remaining_ms = budget_ms - elapsed.as_secs_f64() * 1000.0;
    (remaining_ms > 0.0).then(|| Duration::from_secs_f64(remaining_ms / 1000.0))
}
