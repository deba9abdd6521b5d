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

//! Logical RetroPad button layout
//!
//! Every platform driver reduces its vendor pad snapshot to a [`RetroPad`]
//! bitmask. Bits 0-15 are the libretro joypad buttons, followed by turbo,
//! the eight analog stick directions and the eight analog-as-dpad bits
//! produced by dpad emulation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Logical button bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RetroPad: u64 {
        const B = 1 << 0;
        const Y = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
        const A = 1 << 8;
        const X = 1 << 9;
        const L = 1 << 10;
        const R = 1 << 11;
        const L2 = 1 << 12;
        const R2 = 1 << 13;
        const L3 = 1 << 14;
        const R3 = 1 << 15;

        const TURBO = 1 << 16;

        const LSTICK_LEFT = 1 << 17;
        const LSTICK_RIGHT = 1 << 18;
        const LSTICK_UP = 1 << 19;
        const LSTICK_DOWN = 1 << 20;
        const RSTICK_LEFT = 1 << 21;
        const RSTICK_RIGHT = 1 << 22;
        const RSTICK_UP = 1 << 23;
        const RSTICK_DOWN = 1 << 24;

        const LSTICK_DPAD_LEFT = 1 << 25;
        const LSTICK_DPAD_RIGHT = 1 << 26;
        const LSTICK_DPAD_UP = 1 << 27;
        const LSTICK_DPAD_DOWN = 1 << 28;
        const RSTICK_DPAD_LEFT = 1 << 29;
        const RSTICK_DPAD_RIGHT = 1 << 30;
        const RSTICK_DPAD_UP = 1 << 31;
        const RSTICK_DPAD_DOWN = 1 << 32;
    }
}

/// Bind ids (index into a player's bind row)
pub mod bind_id {
    pub const B: usize = 0;
    pub const Y: usize = 1;
    pub const SELECT: usize = 2;
    pub const START: usize = 3;
    pub const UP: usize = 4;
    pub const DOWN: usize = 5;
    pub const LEFT: usize = 6;
    pub const RIGHT: usize = 7;
    pub const A: usize = 8;
    pub const X: usize = 9;
    pub const L: usize = 10;
    pub const R: usize = 11;
    pub const L2: usize = 12;
    pub const R2: usize = 13;
    pub const L3: usize = 14;
    pub const R3: usize = 15;
    pub const TURBO: usize = 16;
    pub const LSTICK_LEFT: usize = 17;
    pub const LSTICK_RIGHT: usize = 18;
    pub const LSTICK_UP: usize = 19;
    pub const LSTICK_DOWN: usize = 20;
    pub const RSTICK_LEFT: usize = 21;
    pub const RSTICK_RIGHT: usize = 22;
    pub const RSTICK_UP: usize = 23;
    pub const RSTICK_DOWN: usize = 24;

    /// Number of binds per player
    pub const COUNT: usize = 25;
}

/// Mouse ids for [`Device::Mouse`] queries
pub mod mouse_id {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const LEFT: usize = 2;
    pub const RIGHT: usize = 3;
}

/// Input device class queried through `InputDriver::state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Joypad,
    Mouse,
}

/// Analog-to-dpad emulation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpadEmulation {
    /// Analog sticks never act as a dpad
    None,
    /// Left stick drives the dpad binds
    #[default]
    LeftStick,
    /// Right stick drives the dpad binds
    RightStick,
}

impl DpadEmulation {
    pub fn is_enabled(self) -> bool {
        self != DpadEmulation::None
    }

    /// Joykeys for the up/down/left/right binds under this policy
    pub fn dpad_joykeys(self) -> [RetroPad; 4] {
        match self {
            DpadEmulation::None => [RetroPad::UP, RetroPad::DOWN, RetroPad::LEFT, RetroPad::RIGHT],
            DpadEmulation::LeftStick => [
                RetroPad::UP | RetroPad::LSTICK_DPAD_UP,
                RetroPad::DOWN | RetroPad::LSTICK_DPAD_DOWN,
                RetroPad::LEFT | RetroPad::LSTICK_DPAD_LEFT,
                RetroPad::RIGHT | RetroPad::LSTICK_DPAD_RIGHT,
            ],
            DpadEmulation::RightStick => [
                RetroPad::UP | RetroPad::RSTICK_DPAD_UP,
                RetroPad::DOWN | RetroPad::RSTICK_DPAD_DOWN,
                RetroPad::LEFT | RetroPad::RSTICK_DPAD_LEFT,
                RetroPad::RIGHT | RetroPad::RSTICK_DPAD_RIGHT,
            ],
        }
    }
}

/// Axis value at or below which a stick counts as pushed left/up
pub const DEADZONE_LOW: u8 = 55;

/// Axis value at or above which a stick counts as pushed right/down
pub const DEADZONE_HIGH: u8 = 210;

/// Raw analog stick positions, 0..=255 with 128 at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogSticks {
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
}

impl Default for AnalogSticks {
    fn default() -> Self {
        Self {
            left_x: 0x80,
            left_y: 0x80,
            right_x: 0x80,
            right_y: 0x80,
        }
    }
}

impl AnalogSticks {
    /// Analog-as-dpad bits for both sticks
    pub fn dpad_bits(&self) -> RetroPad {
        let mut bits = RetroPad::empty();
        bits.set(RetroPad::LSTICK_DPAD_LEFT, self.left_x <= DEADZONE_LOW);
        bits.set(RetroPad::LSTICK_DPAD_RIGHT, self.left_x >= DEADZONE_HIGH);
        bits.set(RetroPad::LSTICK_DPAD_UP, self.left_y <= DEADZONE_LOW);
        bits.set(RetroPad::LSTICK_DPAD_DOWN, self.left_y >= DEADZONE_HIGH);
        bits.set(RetroPad::RSTICK_DPAD_LEFT, self.right_x <= DEADZONE_LOW);
        bits.set(RetroPad::RSTICK_DPAD_RIGHT, self.right_x >= DEADZONE_HIGH);
        bits.set(RetroPad::RSTICK_DPAD_UP, self.right_y <= DEADZONE_LOW);
        bits.set(RetroPad::RSTICK_DPAD_DOWN, self.right_y >= DEADZONE_HIGH);
        bits
    }
}
