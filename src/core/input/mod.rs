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

//! Controller input mapping
//!
//! Platform pad drivers translate their vendor snapshot into a [`RetroPad`]
//! bitmask per port, then derive the frontend hot keys from port 0 with
//! [`derive_hotkeys`]. All drivers share:
//!
//! - the same logical bit layout ([`retropad`])
//! - the same three dpad emulation policies ([`DpadEmulation`])
//! - the L3+R3 menu combo, which works regardless of platform
//!
//! Bind editing lives in [`binds`], menu navigation tables in [`nav`] and the
//! PlayStation 3 driver in [`ps3`].

pub mod binds;
pub mod nav;
pub mod ps3;
pub mod retropad;

#[cfg(test)]
mod tests;

use crate::core::lifecycle::Commands;
pub use binds::{InputSettings, Keybind, KeybindAction, PlatformBindTable};
pub use nav::{NavBindTable, NavButtons};
pub use retropad::{AnalogSticks, Device, DpadEmulation, RetroPad};

/// Maximum number of pads polled
pub const MAX_PADS: usize = 7;

/// Input driver interface used by the frontend and the menu
pub trait InputDriver {
    /// Sample all connected devices
    fn poll(&mut self);

    /// Query one input
    ///
    /// # Arguments
    ///
    /// * `binds` - Bind row of the queried player
    /// * `port` - Player port
    /// * `device` - Device class
    /// * `index` - Device sub-index (unused by digital pads)
    /// * `id` - Bind id for joypads, mouse id for mice
    ///
    /// # Returns
    ///
    /// 1/0 for buttons, a signed delta for mouse axes
    fn state(&self, binds: &[Keybind], port: usize, device: Device, index: usize, id: usize)
        -> i16;

    /// Hot keys held at the last poll
    fn hotkeys(&self) -> Commands;

    /// Whether any of `keys` was held at the last poll
    fn key_pressed(&self, keys: Commands) -> bool {
        self.hotkeys().intersects(keys)
    }

    /// Change the dpad emulation policy of a port
    fn set_dpad_emulation(&mut self, port: usize, mode: DpadEmulation) {
        let _ = (port, mode);
    }

    /// Driver name
    fn ident(&self) -> &'static str;
}

/// Derive frontend hot keys from the port 0 pad state
///
/// With dpad emulation enabled the right stick doubles as a hot-key pad:
///
/// | Gesture        | alone        | with R2     |
/// |----------------|--------------|-------------|
/// | right stick up   | rewind       | load state  |
/// | right stick down | fast-forward | save state  |
/// | right stick right| -            | slot + 1    |
/// | right stick left | -            | slot - 1    |
///
/// L3+R3 always toggles the menu.
pub fn derive_hotkeys(pad: RetroPad, dpad_emulation: DpadEmulation) -> Commands {
    let mut hotkeys = Commands::empty();

    if dpad_emulation.is_enabled() {
        let r2 = pad.contains(RetroPad::R2);
        let up = pad.contains(RetroPad::RSTICK_DPAD_UP);
        let down = pad.contains(RetroPad::RSTICK_DPAD_DOWN);

        hotkeys.set(Commands::FAST_FORWARD, down && !r2);
        hotkeys.set(Commands::REWIND, up && !r2);
        hotkeys.set(Commands::LOAD_STATE, up && r2);
        hotkeys.set(Commands::SAVE_STATE, down && r2);
        hotkeys.set(
            Commands::STATE_SLOT_PLUS,
            r2 && pad.contains(RetroPad::RSTICK_DPAD_RIGHT),
        );
        hotkeys.set(
            Commands::STATE_SLOT_MINUS,
            r2 && pad.contains(RetroPad::RSTICK_DPAD_LEFT),
        );
    }

    if pad.contains(RetroPad::L3 | RetroPad::R3) {
        hotkeys |= Commands::MENU_TOGGLE;
    }

    hotkeys
}

/// Test whether a bind is held in a pad state
pub fn bind_pressed(binds: &[Keybind], id: usize, pad: RetroPad) -> bool {
    binds
        .get(id)
        .and_then(|b| b.joykey)
        .is_some_and(|joykey| pad.intersects(joykey))
}

/// Platform-neutral pad snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadSnapshot {
    /// Digital buttons (joypad bits only)
    pub buttons: RetroPad,

    /// Analog stick positions
    pub sticks: AnalogSticks,
}

impl PadSnapshot {
    /// Translate into the logical bitmask
    pub fn to_retropad(&self, dpad_emulation: DpadEmulation) -> RetroPad {
        let mut pad = self.buttons;
        if dpad_emulation.is_enabled() {
            pad |= self.sticks.dpad_bits();
        }
        pad
    }
}

/// Source of platform-neutral pad snapshots
pub trait PadSource {
    /// Snapshot for a port, `None` if nothing new was read
    fn read(&mut self, port: usize) -> Option<PadSnapshot>;

    /// Number of connected pads
    fn connected(&self) -> usize;
}

/// Input driver over a [`PadSource`]
#[derive(Debug)]
pub struct SnapshotInput<S> {
    source: S,
    state: [RetroPad; MAX_PADS],
    dpad_emulation: [DpadEmulation; MAX_PADS],
    hotkeys: Commands,
    connected: usize,
}

impl<S: PadSource> SnapshotInput<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: [RetroPad::empty(); MAX_PADS],
            dpad_emulation: [DpadEmulation::None; MAX_PADS],
            hotkeys: Commands::empty(),
            connected: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Logical state of a port at the last poll
    pub fn pad_state(&self, port: usize) -> RetroPad {
        self.state.get(port).copied().unwrap_or_default()
    }
}

impl<S: PadSource> InputDriver for SnapshotInput<S> {
    fn poll(&mut self) {
        for port in 0..MAX_PADS {
            if let Some(snapshot) = self.source.read(port) {
                self.state[port] = snapshot.to_retropad(self.dpad_emulation[port]);
            }
        }

        self.hotkeys = derive_hotkeys(self.state[0], self.dpad_emulation[0]);
        self.connected = self.source.connected();
    }

    fn state(&self, binds: &[Keybind], port: usize, device: Device, _index: usize, id: usize) -> i16 {
        if port >= self.connected.min(MAX_PADS) || device != Device::Joypad {
            return 0;
        }
        i16::from(bind_pressed(binds, id, self.state[port]))
    }

    fn hotkeys(&self) -> Commands {
        self.hotkeys
    }

    fn set_dpad_emulation(&mut self, port: usize, mode: DpadEmulation) {
        if let Some(slot) = self.dpad_emulation.get_mut(port) {
            *slot = mode;
        }
    }

    fn ident(&self) -> &'static str {
        "snapshot"
    }
}
