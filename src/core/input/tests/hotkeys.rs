// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Hot key derivation tests

use super::super::*;
use crate::core::lifecycle::Commands;

#[test]
fn test_l3_r3_toggles_menu_without_dpad_emulation() {
    let pad = RetroPad::L3 | RetroPad::R3;
    assert_eq!(derive_hotkeys(pad, DpadEmulation::None), Commands::MENU_TOGGLE);
}

#[test]
fn test_l3_alone_is_not_menu() {
    assert!(derive_hotkeys(RetroPad::L3, DpadEmulation::LeftStick).is_empty());
}

#[test]
fn test_right_stick_gestures() {
    let dpad = DpadEmulation::LeftStick;

    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_UP, dpad),
        Commands::REWIND
    );
    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_DOWN, dpad),
        Commands::FAST_FORWARD
    );
    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_UP | RetroPad::R2, dpad),
        Commands::LOAD_STATE
    );
    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_DOWN | RetroPad::R2, dpad),
        Commands::SAVE_STATE
    );
    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_RIGHT | RetroPad::R2, dpad),
        Commands::STATE_SLOT_PLUS
    );
    assert_eq!(
        derive_hotkeys(RetroPad::RSTICK_DPAD_LEFT | RetroPad::R2, dpad),
        Commands::STATE_SLOT_MINUS
    );

    // Sideways without R2 does nothing
    assert!(derive_hotkeys(RetroPad::RSTICK_DPAD_LEFT, dpad).is_empty());
}

#[test]
fn test_gestures_ignored_without_dpad_emulation() {
    let pad = RetroPad::RSTICK_DPAD_UP | RetroPad::R2;
    assert!(derive_hotkeys(pad, DpadEmulation::None).is_empty());
}

#[test]
fn test_bind_pressed() {
    let binds = [
        Keybind::new(0, Some(RetroPad::B)),
        Keybind::new(1, None),
        Keybind::new(2, Some(RetroPad::UP | RetroPad::LSTICK_DPAD_UP)),
    ];

    assert!(bind_pressed(&binds, 0, RetroPad::B));
    assert!(!bind_pressed(&binds, 1, RetroPad::all()));
    assert!(bind_pressed(&binds, 2, RetroPad::LSTICK_DPAD_UP));
    assert!(!bind_pressed(&binds, 7, RetroPad::all()));
}

struct OnePad {
    snapshot: Option<PadSnapshot>,
}

impl PadSource for OnePad {
    fn read(&mut self, port: usize) -> Option<PadSnapshot> {
        if port == 0 {
            self.snapshot.take()
        } else {
            None
        }
    }

    fn connected(&self) -> usize {
        1
    }
}

#[test]
fn test_snapshot_input_keeps_state_without_new_data() {
    let mut input = SnapshotInput::new(OnePad {
        snapshot: Some(PadSnapshot {
            buttons: RetroPad::L3 | RetroPad::R3,
            sticks: AnalogSticks::default(),
        }),
    });

    input.poll();
    assert!(input.key_pressed(Commands::MENU_TOGGLE));

    // No new data, state and hot keys are retained
    input.poll();
    assert!(input.key_pressed(Commands::MENU_TOGGLE));
    assert_eq!(input.pad_state(0), RetroPad::L3 | RetroPad::R3);
}

#[test]
fn test_snapshot_input_ignores_unconnected_ports() {
    let mut input = SnapshotInput::new(OnePad {
        snapshot: Some(PadSnapshot {
            buttons: RetroPad::START,
            sticks: AnalogSticks::default(),
        }),
    });
    input.poll();

    let binds = [Keybind::new(0, Some(RetroPad::START))];
    assert_eq!(input.state(&binds, 0, Device::Joypad, 0, 0), 1);
    assert_eq!(input.state(&binds, 1, Device::Joypad, 0, 0), 0);
    assert_eq!(input.state(&binds, 0, Device::Mouse, 0, 0), 0);
}
