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

//! Editable button bindings
//!
//! Each platform ships a [`PlatformBindTable`]: the ordered list of physical
//! inputs a logical bind may be mapped to, with their labels. The menu walks
//! that list with [`KeybindAction::Increment`] / [`KeybindAction::Decrement`];
//! "no button" sits between the last and the first entry.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::input::binds::{InputSettings, KeybindAction, PS3_BINDS};
//! use rarch_shell::core::input::retropad::bind_id;
//!
//! let mut settings = InputSettings::new(&PS3_BINDS, 1);
//! let joykey = settings.binds(0)[bind_id::B].joykey;
//! assert_eq!(settings.bind_label(joykey), "Cross button");
//!
//! settings.apply(0, bind_id::B, KeybindAction::Increment).unwrap();
//! let joykey = settings.binds(0)[bind_id::B].joykey;
//! assert_eq!(settings.bind_label(joykey), "Square button");
//! ```

use super::retropad::{bind_id, DpadEmulation, RetroPad};
use crate::core::error::{FrontendError, Result};

/// One selectable physical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformBind {
    pub joykey: RetroPad,
    pub label: &'static str,
}

const fn bind(joykey: RetroPad, label: &'static str) -> PlatformBind {
    PlatformBind { joykey, label }
}

/// Capability-described bind table for one platform
#[derive(Debug)]
pub struct PlatformBindTable {
    /// Platform name (for logs)
    pub name: &'static str,

    /// Selectable inputs; entry `i` is the default for bind id `i`
    pub keys: &'static [PlatformBind],

    /// Whether the pad has analog sticks usable for dpad emulation
    pub analog_dpad: bool,
}

impl PlatformBindTable {
    /// Label for a joykey, or "No button" / "Unknown"
    pub fn label(&self, joykey: Option<RetroPad>) -> &'static str {
        match joykey {
            None => "No button",
            Some(joykey) => self
                .keys
                .iter()
                .find(|k| k.joykey == joykey)
                .map(|k| k.label)
                .unwrap_or("Unknown"),
        }
    }

    /// Default joykey for a bind id
    pub fn default_for(&self, id: usize) -> Option<RetroPad> {
        self.keys.get(id).map(|k| k.joykey)
    }

    fn next(&self, joykey: Option<RetroPad>) -> Option<RetroPad> {
        let joykey = match joykey {
            None => return self.keys.first().map(|k| k.joykey),
            Some(joykey) => joykey,
        };

        let position = self.keys.iter().position(|k| k.joykey == joykey)?;
        self.keys.get(position + 1).map(|k| k.joykey)
    }

    fn prev(&self, joykey: Option<RetroPad>) -> Option<RetroPad> {
        let joykey = match joykey {
            None => return self.keys.last().map(|k| k.joykey),
            Some(joykey) => joykey,
        };

        let position = self.keys.iter().position(|k| k.joykey == joykey)?;
        position.checked_sub(1).map(|p| self.keys[p].joykey)
    }
}

/// PlayStation 3 pad (DualShock 3 / Sixaxis)
pub static PS3_BINDS: PlatformBindTable = PlatformBindTable {
    name: "ps3",
    keys: &[
        bind(RetroPad::B, "Cross button"),
        bind(RetroPad::Y, "Square button"),
        bind(RetroPad::SELECT, "Select button"),
        bind(RetroPad::START, "Start button"),
        bind(RetroPad::UP, "D-Pad Up"),
        bind(RetroPad::DOWN, "D-Pad Down"),
        bind(RetroPad::LEFT, "D-Pad Left"),
        bind(RetroPad::RIGHT, "D-Pad Right"),
        bind(RetroPad::A, "Circle button"),
        bind(RetroPad::X, "Triangle button"),
        bind(RetroPad::L, "L1 button"),
        bind(RetroPad::R, "R1 button"),
        bind(RetroPad::L2, "L2 button"),
        bind(RetroPad::R2, "R2 button"),
        bind(RetroPad::L3, "L3 button"),
        bind(RetroPad::R3, "R3 button"),
        bind(RetroPad::TURBO, "Turbo button (Unmapped)"),
        bind(RetroPad::LSTICK_LEFT, "LStick Left"),
        bind(RetroPad::LSTICK_RIGHT, "LStick Right"),
        bind(RetroPad::LSTICK_UP, "LStick Up"),
        bind(RetroPad::LSTICK_DOWN, "LStick Down"),
        bind(RetroPad::RSTICK_LEFT, "RStick Left"),
        bind(RetroPad::RSTICK_RIGHT, "RStick Right"),
        bind(RetroPad::RSTICK_UP, "RStick Up"),
        bind(RetroPad::RSTICK_DOWN, "RStick Down"),
        bind(
            RetroPad::LEFT.union(RetroPad::LSTICK_DPAD_LEFT),
            "LStick D-Pad Left",
        ),
        bind(
            RetroPad::RIGHT.union(RetroPad::LSTICK_DPAD_RIGHT),
            "LStick D-Pad Right",
        ),
        bind(RetroPad::UP.union(RetroPad::LSTICK_DPAD_UP), "LStick D-Pad Up"),
        bind(
            RetroPad::DOWN.union(RetroPad::LSTICK_DPAD_DOWN),
            "LStick D-Pad Down",
        ),
        bind(
            RetroPad::LEFT.union(RetroPad::RSTICK_DPAD_LEFT),
            "RStick D-Pad Left",
        ),
        bind(
            RetroPad::RIGHT.union(RetroPad::RSTICK_DPAD_RIGHT),
            "RStick D-Pad Right",
        ),
        bind(RetroPad::UP.union(RetroPad::RSTICK_DPAD_UP), "RStick D-Pad Up"),
        bind(
            RetroPad::DOWN.union(RetroPad::RSTICK_DPAD_DOWN),
            "RStick D-Pad Down",
        ),
    ],
    analog_dpad: true,
};

/// Digital-only pad (keyboard or generic gamepad)
pub static GENERIC_BINDS: PlatformBindTable = PlatformBindTable {
    name: "generic",
    keys: &[
        bind(RetroPad::B, "B button"),
        bind(RetroPad::Y, "Y button"),
        bind(RetroPad::SELECT, "Select button"),
        bind(RetroPad::START, "Start button"),
        bind(RetroPad::UP, "D-Pad Up"),
        bind(RetroPad::DOWN, "D-Pad Down"),
        bind(RetroPad::LEFT, "D-Pad Left"),
        bind(RetroPad::RIGHT, "D-Pad Right"),
        bind(RetroPad::A, "A button"),
        bind(RetroPad::X, "X button"),
        bind(RetroPad::L, "L button"),
        bind(RetroPad::R, "R button"),
        bind(RetroPad::L2, "L2 button"),
        bind(RetroPad::R2, "R2 button"),
        bind(RetroPad::L3, "L3 button"),
        bind(RetroPad::R3, "R3 button"),
        bind(RetroPad::TURBO, "Turbo button (Unmapped)"),
    ],
    analog_dpad: false,
};

/// A logical bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keybind {
    /// Bind id (see [`bind_id`])
    pub id: usize,

    /// Current joykey (`None` = no button)
    pub joykey: Option<RetroPad>,

    /// Default joykey
    pub def_joykey: Option<RetroPad>,
}

impl Keybind {
    /// Bind with the same current and default joykey
    pub fn new(id: usize, joykey: Option<RetroPad>) -> Self {
        Self {
            id,
            joykey,
            def_joykey: joykey,
        }
    }
}

/// Bind editing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeybindAction {
    /// Select the previous table entry
    Decrement,
    /// Select the next table entry
    Increment,
    /// Restore this bind's default
    SetDefault,
    /// Restore every bind of the port and reset dpad emulation to the left stick
    SetDefaultBinds,
    /// Switch dpad emulation and rebind the four dpad ids accordingly
    SetAnalogDpad(DpadEmulation),
}

/// Per-player binds plus per-port dpad emulation
#[derive(Debug, Clone)]
pub struct InputSettings {
    table: &'static PlatformBindTable,
    binds: Vec<Vec<Keybind>>,
    dpad_emulation: Vec<DpadEmulation>,
}

impl InputSettings {
    /// Default binds for `players` ports
    pub fn new(table: &'static PlatformBindTable, players: usize) -> Self {
        let mut settings = Self {
            table,
            binds: vec![Vec::new(); players],
            dpad_emulation: vec![DpadEmulation::default(); players],
        };

        for port in 0..players {
            settings.reset_port(port);
        }
        settings
    }

    /// Default binds, then the configured dpad policy per port
    pub fn with_dpad_modes(table: &'static PlatformBindTable, modes: &[DpadEmulation]) -> Self {
        let players = modes.len().max(1);
        let mut settings = Self::new(table, players);

        for (port, &mode) in modes.iter().enumerate() {
            settings.set_dpad(port, mode);
        }
        settings
    }

    pub fn table(&self) -> &'static PlatformBindTable {
        self.table
    }

    pub fn players(&self) -> usize {
        self.binds.len()
    }

    /// Bind row for a port (empty for unknown ports)
    pub fn binds(&self, port: usize) -> &[Keybind] {
        self.binds.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dpad emulation policy for a port
    pub fn dpad_emulation(&self, port: usize) -> DpadEmulation {
        self.dpad_emulation
            .get(port)
            .copied()
            .unwrap_or(DpadEmulation::None)
    }

    /// Label for a joykey on this platform
    pub fn bind_label(&self, joykey: Option<RetroPad>) -> &'static str {
        self.table.label(joykey)
    }

    /// Apply a bind editing action
    ///
    /// # Arguments
    ///
    /// * `port` - Player port
    /// * `id` - Bind id (ignored by port-wide actions)
    /// * `action` - Operation to perform
    ///
    /// # Returns
    ///
    /// `Err(FrontendError::InvalidBind)` if the port or id does not exist
    pub fn apply(&mut self, port: usize, id: usize, action: KeybindAction) -> Result<()> {
        if port >= self.binds.len() {
            return Err(FrontendError::InvalidBind { port, id });
        }

        match action {
            KeybindAction::SetDefaultBinds => self.reset_port(port),
            KeybindAction::SetAnalogDpad(mode) => self.set_dpad(port, mode),
            KeybindAction::Decrement | KeybindAction::Increment | KeybindAction::SetDefault => {
                let table = self.table;
                let bind = self.binds[port]
                    .get_mut(id)
                    .ok_or(FrontendError::InvalidBind { port, id })?;

                bind.joykey = match action {
                    KeybindAction::Decrement => table.prev(bind.joykey),
                    KeybindAction::Increment => table.next(bind.joykey),
                    _ => bind.def_joykey,
                };
            }
        }

        Ok(())
    }

    fn reset_port(&mut self, port: usize) {
        let table = self.table;
        self.binds[port] = (0..bind_id::COUNT)
            .map(|id| Keybind::new(id, table.default_for(id)))
            .collect();

        let mode = if table.analog_dpad {
            DpadEmulation::LeftStick
        } else {
            DpadEmulation::None
        };
        self.set_dpad(port, mode);
    }

    fn set_dpad(&mut self, port: usize, mode: DpadEmulation) {
        let mode = if mode.is_enabled() && !self.table.analog_dpad {
            log::warn!(
                "{} pads have no analog sticks, disabling dpad emulation on port {}",
                self.table.name,
                port
            );
            DpadEmulation::None
        } else {
            mode
        };

        if port >= self.binds.len() {
            return;
        }

        self.dpad_emulation[port] = mode;
        let ids = [bind_id::UP, bind_id::DOWN, bind_id::LEFT, bind_id::RIGHT];
        for (id, joykey) in ids.into_iter().zip(mode.dpad_joykeys()) {
            self.binds[port][id].joykey = Some(joykey);
        }
    }
}
