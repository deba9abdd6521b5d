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

//! Menu navigation buttons

use super::binds::Keybind;
use super::retropad::{Device, RetroPad};
use super::InputDriver;
use crate::core::lifecycle::Commands;
use bitflags::bitflags;

bitflags! {
    /// Menu navigation state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NavButtons: u32 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const A = 1 << 4;
        const B = 1 << 5;
        const X = 1 << 6;
        const Y = 1 << 7;
        const START = 1 << 8;
        const SELECT = 1 << 9;
        const L1 = 1 << 10;
        const R1 = 1 << 11;
        const L2 = 1 << 12;
        const R2 = 1 << 13;
        const MENU = 1 << 14;
    }
}

impl NavButtons {
    /// Directions that auto-repeat while held
    pub const REPEATING: NavButtons = NavButtons::UP
        .union(NavButtons::DOWN)
        .union(NavButtons::LEFT)
        .union(NavButtons::RIGHT)
        .union(NavButtons::L2)
        .union(NavButtons::R2);
}

/// Navigation button to joykey mapping for one platform
#[derive(Debug)]
pub struct NavBindTable {
    pub name: &'static str,
    pub binds: &'static [(NavButtons, RetroPad)],
}

/// Digital pads: dpad plus face buttons
pub static GENERIC_NAV: NavBindTable = NavBindTable {
    name: "generic",
    binds: &[
        (NavButtons::UP, RetroPad::UP),
        (NavButtons::DOWN, RetroPad::DOWN),
        (NavButtons::LEFT, RetroPad::LEFT),
        (NavButtons::RIGHT, RetroPad::RIGHT),
        (NavButtons::A, RetroPad::A),
        (NavButtons::B, RetroPad::B),
        (NavButtons::START, RetroPad::START),
        (NavButtons::SELECT, RetroPad::SELECT),
    ],
};

/// Console pads: the left stick navigates too, shoulders page
pub static CONSOLE_NAV: NavBindTable = NavBindTable {
    name: "console",
    binds: &[
        (
            NavButtons::UP,
            RetroPad::UP.union(RetroPad::LSTICK_DPAD_UP),
        ),
        (
            NavButtons::DOWN,
            RetroPad::DOWN.union(RetroPad::LSTICK_DPAD_DOWN),
        ),
        (
            NavButtons::LEFT,
            RetroPad::LEFT.union(RetroPad::LSTICK_DPAD_LEFT),
        ),
        (
            NavButtons::RIGHT,
            RetroPad::RIGHT.union(RetroPad::LSTICK_DPAD_RIGHT),
        ),
        (NavButtons::B, RetroPad::B),
        (NavButtons::A, RetroPad::A),
        (NavButtons::X, RetroPad::X),
        (NavButtons::Y, RetroPad::Y),
        (NavButtons::START, RetroPad::START),
        (NavButtons::SELECT, RetroPad::SELECT),
        (NavButtons::L1, RetroPad::L),
        (NavButtons::R1, RetroPad::R),
        (NavButtons::L2, RetroPad::L2),
        (NavButtons::R2, RetroPad::R2),
    ],
};

impl NavBindTable {
    /// Read the navigation state of port 0
    ///
    /// The menu toggle hot key is folded in as [`NavButtons::MENU`].
    pub fn read(&self, input: &dyn InputDriver) -> NavButtons {
        let binds: Vec<Keybind> = self
            .binds
            .iter()
            .enumerate()
            .map(|(id, &(_, joykey))| Keybind::new(id, Some(joykey)))
            .collect();

        let mut state = NavButtons::empty();
        for (id, &(nav, _)) in self.binds.iter().enumerate() {
            if input.state(&binds, 0, Device::Joypad, 0, id) != 0 {
                state |= nav;
            }
        }

        if input.key_pressed(Commands::MENU_TOGGLE) {
            state |= NavButtons::MENU;
        }
        state
    }
}
