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

//! Frontend lifecycle state
//!
//! The frontend alternates between loading content, running the core and
//! running the menu. Requests for those modes are kept as [`ModeFlags`]; the
//! scheduler resolves them into exactly one [`Mode`] per iteration using a
//! fixed priority:
//!
//! ```text
//! shutdown > LOAD_GAME > GAME > MENU > terminate
//! ```
//!
//! Hot keys (save state, rewind, menu toggle, ...) are a separate concern:
//! the input driver publishes the held set as [`Commands`], and newly pressed
//! keys become one-shot [`Command`] events in a FIFO queue.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::lifecycle::{Lifecycle, Mode, ModeFlags};
//!
//! let mut lifecycle = Lifecycle::new();
//! lifecycle.set(ModeFlags::GAME | ModeFlags::MENU | ModeFlags::LOAD_GAME);
//! assert_eq!(lifecycle.next_mode(false), Mode::LoadGame);
//!
//! lifecycle.clear(ModeFlags::LOAD_GAME);
//! assert_eq!(lifecycle.next_mode(false), Mode::Game);
//! ```

use bitflags::bitflags;
use std::collections::VecDeque;

bitflags! {
    /// Persistent mode requests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u32 {
        /// Run the core
        const GAME = 1 << 0;
        /// Run the menu
        const MENU = 1 << 1;
        /// Menu is being entered; consumed by the first menu iteration
        const MENU_PREINIT = 1 << 2;
        /// Load the pending content
        const LOAD_GAME = 1 << 3;
        /// Show informational messages while loading
        const INFO_DRAW = 1 << 4;
    }
}

bitflags! {
    /// Held hot keys, rewritten by the input driver on every poll
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Commands: u32 {
        const QUIT = 1 << 0;
        const SAVE_STATE = 1 << 1;
        const LOAD_STATE = 1 << 2;
        const REWIND = 1 << 3;
        const FAST_FORWARD = 1 << 4;
        const STATE_SLOT_PLUS = 1 << 5;
        const STATE_SLOT_MINUS = 1 << 6;
        const MENU_TOGGLE = 1 << 7;
    }
}

/// One-shot command event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    SaveState,
    LoadState,
    Rewind,
    FastForward,
    StateSlotPlus,
    StateSlotMinus,
    MenuToggle,
}

impl Command {
    /// All commands, in queueing order
    pub const ALL: [Command; 8] = [
        Command::MenuToggle,
        Command::Quit,
        Command::SaveState,
        Command::LoadState,
        Command::StateSlotPlus,
        Command::StateSlotMinus,
        Command::Rewind,
        Command::FastForward,
    ];

    /// Hot-key flag for this command
    pub fn flag(self) -> Commands {
        match self {
            Command::Quit => Commands::QUIT,
            Command::SaveState => Commands::SAVE_STATE,
            Command::LoadState => Commands::LOAD_STATE,
            Command::Rewind => Commands::REWIND,
            Command::FastForward => Commands::FAST_FORWARD,
            Command::StateSlotPlus => Commands::STATE_SLOT_PLUS,
            Command::StateSlotMinus => Commands::STATE_SLOT_MINUS,
            Command::MenuToggle => Commands::MENU_TOGGLE,
        }
    }
}

/// Execution mode chosen for one scheduler iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Load pending content (transient, one iteration)
    LoadGame,
    /// Step the core
    Game,
    /// Step the menu
    Menu,
    /// Leave the main loop (absorbing)
    Terminated,
}

/// Lifecycle state: mode requests plus the command event queue
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    flags: ModeFlags,
    commands: VecDeque<Command>,
    previous_hotkeys: Commands,
    terminated: bool,
}

impl Lifecycle {
    /// Create a zeroed lifecycle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode flags
    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    pub fn contains(&self, flags: ModeFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn set(&mut self, flags: ModeFlags) {
        self.flags.insert(flags);
    }

    pub fn clear(&mut self, flags: ModeFlags) {
        self.flags.remove(flags);
    }

    /// Request loading the pending content on the next iteration
    pub fn request_load(&mut self) {
        self.flags.insert(ModeFlags::LOAD_GAME);
    }

    /// Request running the core
    pub fn request_game(&mut self) {
        self.flags.insert(ModeFlags::GAME);
    }

    /// Request running the menu
    pub fn request_menu(&mut self) {
        self.flags.insert(ModeFlags::MENU);
    }

    /// Resolve the mode for this iteration
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Whether the core or the user requested shutdown
    ///
    /// # Returns
    ///
    /// The highest-priority requested mode, or [`Mode::Terminated`] once
    /// nothing is requested. Termination is absorbing.
    pub fn next_mode(&self, shutdown: bool) -> Mode {
        if self.terminated || shutdown {
            Mode::Terminated
        } else if self.flags.contains(ModeFlags::LOAD_GAME) {
            Mode::LoadGame
        } else if self.flags.contains(ModeFlags::GAME) {
            Mode::Game
        } else if self.flags.contains(ModeFlags::MENU) {
            Mode::Menu
        } else {
            Mode::Terminated
        }
    }

    /// Enter the absorbing terminated state
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Queue one-shot events for hot keys pressed since the previous call
    ///
    /// Keys that stay held do not re-fire.
    ///
    /// # Returns
    ///
    /// The newly pressed set
    pub fn latch_hotkeys(&mut self, held: Commands) -> Commands {
        let pressed = held & !self.previous_hotkeys;
        self.previous_hotkeys = held;

        for command in Command::ALL {
            if pressed.contains(command.flag()) {
                self.commands.push_back(command);
            }
        }
        pressed
    }

    /// Queue a command event directly
    pub fn push_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Take the oldest queued command
    pub fn pop_command(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    /// Number of queued commands
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Reset to the zeroed state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let lifecycle = Lifecycle::new();
        assert!(lifecycle.flags().is_empty());
        assert_eq!(lifecycle.pending_commands(), 0);
        assert_eq!(lifecycle.next_mode(false), Mode::Terminated);
    }

    #[test]
    fn test_priority_order() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_menu();
        assert_eq!(lifecycle.next_mode(false), Mode::Menu);

        lifecycle.request_game();
        assert_eq!(lifecycle.next_mode(false), Mode::Game);

        lifecycle.request_load();
        assert_eq!(lifecycle.next_mode(false), Mode::LoadGame);

        // Shutdown beats everything
        assert_eq!(lifecycle.next_mode(true), Mode::Terminated);
    }

    #[test]
    fn test_info_draw_does_not_select_a_mode() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.set(ModeFlags::INFO_DRAW | ModeFlags::MENU_PREINIT);
        assert_eq!(lifecycle.next_mode(false), Mode::Terminated);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.terminate();
        lifecycle.request_game();
        lifecycle.request_load();
        assert_eq!(lifecycle.next_mode(false), Mode::Terminated);
    }

    #[test]
    fn test_latch_hotkeys_fires_once_per_press() {
        let mut lifecycle = Lifecycle::new();

        let pressed = lifecycle.latch_hotkeys(Commands::SAVE_STATE);
        assert_eq!(pressed, Commands::SAVE_STATE);
        // Still held: no new event
        assert!(lifecycle.latch_hotkeys(Commands::SAVE_STATE).is_empty());
        assert_eq!(lifecycle.pending_commands(), 1);

        // Release then press again
        lifecycle.latch_hotkeys(Commands::empty());
        lifecycle.latch_hotkeys(Commands::SAVE_STATE);
        assert_eq!(lifecycle.pending_commands(), 2);
    }

    #[test]
    fn test_menu_toggle_queued_first() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.latch_hotkeys(Commands::REWIND | Commands::MENU_TOGGLE);

        assert_eq!(lifecycle.pop_command(), Some(Command::MenuToggle));
        assert_eq!(lifecycle.pop_command(), Some(Command::Rewind));
        assert_eq!(lifecycle.pop_command(), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_game();
        lifecycle.push_command(Command::Quit);
        lifecycle.terminate();

        lifecycle.reset();
        assert!(lifecycle.flags().is_empty());
        assert_eq!(lifecycle.pending_commands(), 0);
        assert!(!lifecycle.is_terminated());
    }
}
