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

//! PlayStation 3 pad and mouse driver
//!
//! The cellPad library reports each pad as an array of 16-bit words:
//!
//! ```text
//! word 2: DIGITAL1  select/L3/R3/start/up/right/down/left
//! word 3: DIGITAL2  L2/R2/L1/R1/triangle/circle/cross/square
//! word 4: right stick X    word 5: right stick Y
//! word 6: left stick X     word 7: left stick Y
//! ```
//!
//! A `len` of zero means no new data since the last read; the previous state
//! is kept in that case.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::input::ps3::{digital1, CellPadData};
//! use rarch_shell::core::input::{DpadEmulation, RetroPad};
//!
//! let mut data = CellPadData::connected();
//! data.set_digital1(digital1::L3 | digital1::R3);
//! let pad = data.to_retropad(DpadEmulation::None);
//! assert!(pad.contains(RetroPad::L3 | RetroPad::R3));
//! ```

use super::retropad::{mouse_id, AnalogSticks, Device, DpadEmulation, RetroPad};
use super::{bind_pressed, derive_hotkeys, InputDriver, Keybind, MAX_PADS};
use crate::core::lifecycle::Commands;

/// Number of words in a pad report
pub const CELL_PAD_MAX_CODES: usize = 64;

/// Word offsets in [`CellPadData::button`]
pub mod offset {
    pub const DIGITAL1: usize = 2;
    pub const DIGITAL2: usize = 3;
    pub const ANALOG_RIGHT_X: usize = 4;
    pub const ANALOG_RIGHT_Y: usize = 5;
    pub const ANALOG_LEFT_X: usize = 6;
    pub const ANALOG_LEFT_Y: usize = 7;
}

/// DIGITAL1 bits
pub mod digital1 {
    pub const SELECT: u16 = 1 << 0;
    pub const L3: u16 = 1 << 1;
    pub const R3: u16 = 1 << 2;
    pub const START: u16 = 1 << 3;
    pub const UP: u16 = 1 << 4;
    pub const RIGHT: u16 = 1 << 5;
    pub const DOWN: u16 = 1 << 6;
    pub const LEFT: u16 = 1 << 7;
}

/// DIGITAL2 bits
pub mod digital2 {
    pub const L2: u16 = 1 << 0;
    pub const R2: u16 = 1 << 1;
    pub const L1: u16 = 1 << 2;
    pub const R1: u16 = 1 << 3;
    pub const TRIANGLE: u16 = 1 << 4;
    pub const CIRCLE: u16 = 1 << 5;
    pub const CROSS: u16 = 1 << 6;
    pub const SQUARE: u16 = 1 << 7;
}

const DIGITAL1_MAP: [(u16, RetroPad); 8] = [
    (digital1::LEFT, RetroPad::LEFT),
    (digital1::DOWN, RetroPad::DOWN),
    (digital1::RIGHT, RetroPad::RIGHT),
    (digital1::UP, RetroPad::UP),
    (digital1::START, RetroPad::START),
    (digital1::R3, RetroPad::R3),
    (digital1::L3, RetroPad::L3),
    (digital1::SELECT, RetroPad::SELECT),
];

const DIGITAL2_MAP: [(u16, RetroPad); 8] = [
    (digital2::TRIANGLE, RetroPad::X),
    (digital2::SQUARE, RetroPad::Y),
    (digital2::CROSS, RetroPad::B),
    (digital2::CIRCLE, RetroPad::A),
    (digital2::R1, RetroPad::R),
    (digital2::L1, RetroPad::L),
    (digital2::R2, RetroPad::R2),
    (digital2::L2, RetroPad::L2),
];

/// Raw pad report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPadData {
    /// Number of valid words; 0 when nothing changed
    pub len: usize,

    /// Report words
    pub button: [u16; CELL_PAD_MAX_CODES],
}

impl Default for CellPadData {
    fn default() -> Self {
        Self {
            len: 0,
            button: [0; CELL_PAD_MAX_CODES],
        }
    }
}

impl CellPadData {
    /// A fresh report with sticks centred and nothing pressed
    pub fn connected() -> Self {
        let mut data = Self {
            len: 8,
            ..Self::default()
        };
        data.set_sticks(AnalogSticks::default());
        data
    }

    pub fn set_digital1(&mut self, bits: u16) {
        self.button[offset::DIGITAL1] = bits;
    }

    pub fn set_digital2(&mut self, bits: u16) {
        self.button[offset::DIGITAL2] = bits;
    }

    pub fn set_sticks(&mut self, sticks: AnalogSticks) {
        self.button[offset::ANALOG_LEFT_X] = u16::from(sticks.left_x);
        self.button[offset::ANALOG_LEFT_Y] = u16::from(sticks.left_y);
        self.button[offset::ANALOG_RIGHT_X] = u16::from(sticks.right_x);
        self.button[offset::ANALOG_RIGHT_Y] = u16::from(sticks.right_y);
    }

    /// Analog stick positions (values above 255 saturate)
    pub fn sticks(&self) -> AnalogSticks {
        let axis = |word: usize| u8::try_from(self.button[word]).unwrap_or(u8::MAX);
        AnalogSticks {
            left_x: axis(offset::ANALOG_LEFT_X),
            left_y: axis(offset::ANALOG_LEFT_Y),
            right_x: axis(offset::ANALOG_RIGHT_X),
            right_y: axis(offset::ANALOG_RIGHT_Y),
        }
    }

    /// Translate into the logical bitmask
    pub fn to_retropad(&self, dpad_emulation: DpadEmulation) -> RetroPad {
        let digital1 = self.button[offset::DIGITAL1];
        let digital2 = self.button[offset::DIGITAL2];

        let mut pad = RetroPad::empty();
        for (mask, button) in DIGITAL1_MAP {
            pad.set(button, digital1 & mask != 0);
        }
        for (mask, button) in DIGITAL2_MAP {
            pad.set(button, digital2 & mask != 0);
        }

        if dpad_emulation.is_enabled() {
            pad |= self.sticks().dpad_bits();
        }
        pad
    }
}

/// Mouse button bits
pub const CELL_MOUSE_BUTTON_1: u8 = 1 << 0;
pub const CELL_MOUSE_BUTTON_2: u8 = 1 << 1;

/// Raw mouse report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMouseData {
    pub buttons: u8,
    pub x_axis: i8,
    pub y_axis: i8,
}

/// Access to the cellPad / cellMouse libraries
pub trait CellPadSource {
    /// Read the report of one pad
    fn pad_data(&mut self, port: usize) -> CellPadData;

    /// Number of connected pads
    fn pads_connected(&self) -> usize;

    /// Read the report of one mouse
    fn mouse_data(&mut self, port: usize) -> CellMouseData {
        let _ = port;
        CellMouseData::default()
    }

    /// Number of connected mice
    fn mice_connected(&self) -> usize {
        0
    }
}

/// PlayStation 3 input driver
#[derive(Debug)]
pub struct Ps3Input<S> {
    source: S,
    state: [RetroPad; MAX_PADS],
    mice: [CellMouseData; MAX_PADS],
    dpad_emulation: [DpadEmulation; MAX_PADS],
    hotkeys: Commands,
    pads_connected: usize,
    mice_connected: usize,
}

impl<S: CellPadSource> Ps3Input<S> {
    /// Create the driver with the given per-port dpad policies
    pub fn new(source: S, dpad_modes: &[DpadEmulation]) -> Self {
        let mut dpad_emulation = [DpadEmulation::LeftStick; MAX_PADS];
        for (slot, &mode) in dpad_emulation.iter_mut().zip(dpad_modes) {
            *slot = mode;
        }

        log::info!("PS3 input driver initialized ({} ports)", MAX_PADS);

        Self {
            source,
            state: [RetroPad::empty(); MAX_PADS],
            mice: [CellMouseData::default(); MAX_PADS],
            dpad_emulation,
            hotkeys: Commands::empty(),
            pads_connected: 0,
            mice_connected: 0,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Logical state of a port at the last poll
    pub fn pad_state(&self, port: usize) -> RetroPad {
        self.state.get(port).copied().unwrap_or_default()
    }

    fn mouse_state(&self, port: usize, id: usize) -> i16 {
        if self.mice_connected == 0 {
            return 0;
        }

        let mouse = self.mice[port];
        match id {
            mouse_id::LEFT => i16::from(mouse.buttons & CELL_MOUSE_BUTTON_1 != 0),
            mouse_id::RIGHT => i16::from(mouse.buttons & CELL_MOUSE_BUTTON_2 != 0),
            mouse_id::X => i16::from(mouse.x_axis),
            mouse_id::Y => i16::from(mouse.y_axis),
            _ => 0,
        }
    }
}

impl<S: CellPadSource> InputDriver for Ps3Input<S> {
    fn poll(&mut self) {
        for port in 0..MAX_PADS {
            let data = self.source.pad_data(port);
            if data.len != 0 {
                self.state[port] = data.to_retropad(self.dpad_emulation[port]);
            }
        }

        self.hotkeys = derive_hotkeys(self.state[0], self.dpad_emulation[0]);
        self.pads_connected = self.source.pads_connected();
        self.mice_connected = self.source.mice_connected();

        if self.mice_connected > 0 {
            for port in 0..MAX_PADS {
                self.mice[port] = self.source.mouse_data(port);
            }
        }
    }

    fn state(&self, binds: &[Keybind], port: usize, device: Device, _index: usize, id: usize) -> i16 {
        if port >= self.pads_connected.min(MAX_PADS) {
            return 0;
        }

        match device {
            Device::Joypad => i16::from(bind_pressed(binds, id, self.state[port])),
            Device::Mouse => self.mouse_state(port, id),
        }
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
        "ps3"
    }
}
