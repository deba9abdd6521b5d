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

mod common;

use common::assertions::{assert_messages, assert_next_mode};
use common::fixtures::{write_zip, Harness};
use rarch_shell::core::browser::OPEN_FAILED_MSG;
use rarch_shell::core::config::LoadFailurePolicy;
use rarch_shell::core::error::FrontendError;
use rarch_shell::core::history::RomHistory;
use rarch_shell::core::input::RetroPad;
use rarch_shell::core::lifecycle::{Command, Commands, Mode, ModeFlags};
use rarch_shell::frontend::{ExitStatus, MenuView, VideoDriver};
use std::fs;
use std::path::{Path, PathBuf};

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

#[test]
fn test_start_without_content_opens_menu() {
    let mut h = Harness::new(&["mario.nes"], |_| {});
    h.frontend.start(None, false);

    assert_next_mode(h.frontend.lifecycle(), false, Mode::Menu);
    assert_eq!(h.frontend.iterate(), Mode::Menu);
    assert!(!h.video.video().menu_frame().is_empty());
}

#[test]
fn test_load_wins_over_game_and_menu() {
    let mut h = Harness::new(&["mario.nes"], |_| {});
    h.frontend.start(None, false);
    h.frontend.lifecycle_mut().request_game();
    let content = h.path("mario.nes");
    h.frontend.request_content(content);

    assert_eq!(h.frontend.iterate(), Mode::LoadGame);
    assert!(!h.frontend.lifecycle().contains(ModeFlags::LOAD_GAME));

    // Game outranks the still-requested menu
    assert_next_mode(h.frontend.lifecycle(), false, Mode::Game);
}

#[test]
fn test_content_runs_until_core_shutdown() {
    let mut h = Harness::new(&["mario.nes"], |_| {});
    h.core.state_mut().budget = Some(3);
    h.frontend.start(Some(h.path("mario.nes")), false);

    let status = h.frontend.run().unwrap();
    assert_eq!(status, ExitStatus::Success);

    let core = h.core.state();
    assert_eq!(core.frames, 3);
    assert!(!core.initialized);
    assert_eq!(core.requests.len(), 1);
    assert_eq!(core.requests[0].content_path, Some(h.path("mario.nes")));
    assert_eq!(
        core.requests[0].core_path,
        Some(PathBuf::from("/cores/fake_libretro.so"))
    );
    assert!(!core.requests[0].no_content);

    // History was saved on shutdown with the resolved path
    let history = RomHistory::open(h.path("history.txt"), 10).unwrap();
    let entry = history.get(0).unwrap();
    assert_eq!(entry.content, Some(canonical(&h.path("mario.nes"))));
    assert_eq!(entry.core_name, "Fake");
}

#[test]
fn test_load_failure_exits_by_default() {
    let mut h = Harness::new(&["mario.nes"], |_| {});
    h.core.state_mut().fail_loads = true;
    h.frontend.start(Some(h.path("mario.nes")), false);

    assert_eq!(h.frontend.iterate(), Mode::LoadGame);
    assert_messages(h.frontend.messages(), &["Failed to load mario.nes."]);
    assert_eq!(h.frontend.exit_status(), ExitStatus::LoadFailed);
    assert_eq!(h.frontend.iterate(), Mode::Terminated);

    assert_eq!(h.frontend.run().unwrap().code(), 1);
}

#[test]
fn test_load_failure_can_return_to_menu() {
    let mut h = Harness::new(&["mario.nes"], |s| {
        s.load_failure = LoadFailurePolicy::ReturnToMenu;
    });
    h.core.state_mut().fail_loads = true;
    h.frontend.start(Some(h.path("mario.nes")), false);

    h.frontend.iterate();
    assert!(!h.frontend.lifecycle().contains(ModeFlags::LOAD_GAME));
    assert_eq!(h.frontend.iterate(), Mode::Menu);

    assert!(h
        .video
        .video()
        .messages()
        .iter()
        .any(|m| m == "Failed to load mario.nes."));
    assert_eq!(h.frontend.exit_status(), ExitStatus::Success);
}

#[test]
fn test_empty_directory_reports_one_message() {
    let mut h = Harness::new(&["empty/", "mario.nes"], |_| {});
    h.frontend.start(None, false);

    // Directories sort first, so confirm opens "empty"
    h.tap(RetroPad::B);

    assert_messages(h.frontend.messages(), &[OPEN_FAILED_MSG]);
    assert_eq!(
        h.frontend.menu().browser().directory_path(),
        h.dir.path()
    );
    assert_eq!(h.frontend.menu().browser().ptr(), 0);
}

#[test]
fn test_browser_selection_loads_content() {
    let mut h = Harness::new(&["a.nes", "b.sfc", "notes.txt"], |_| {});
    h.frontend.start(None, false);

    h.tap(RetroPad::DOWN);
    h.tap(RetroPad::B);
    assert_next_mode(h.frontend.lifecycle(), false, Mode::Game);

    assert_eq!(h.frontend.content_path(), Some(h.path("b.sfc").as_path()));
    assert!(h.core.state().initialized);
}

#[test]
fn test_game_waits_for_menu_buttons_release() {
    let mut h = Harness::new(&["a.nes"], |_| {});
    h.frontend.start(None, false);

    // Confirm is still held when the game starts
    h.pad.hold(RetroPad::B);
    assert_eq!(h.frontend.iterate(), Mode::Menu);
    assert_eq!(h.frontend.iterate(), Mode::LoadGame);
    for _ in 0..3 {
        assert_eq!(h.frontend.iterate(), Mode::Game);
    }
    assert_eq!(h.core.state().frames, 0);

    h.pad.release();
    h.frontend.iterate();
    assert_eq!(h.core.state().frames, 1);
}

#[test]
fn test_menu_toggle_round_trip() {
    let combo = RetroPad::L3 | RetroPad::R3;
    let mut h = Harness::new(&["a.nes"], |_| {});
    h.frontend.start(Some(h.path("a.nes")), false);
    h.iterate_n(2);
    assert_eq!(h.core.state().frames, 1);

    h.video.video_mut().set_nonblock_state(true);

    h.pad.hold(combo);
    assert_eq!(h.frontend.iterate(), Mode::Game);
    assert_next_mode(h.frontend.lifecycle(), false, Mode::Menu);

    // Entering the menu forces vsync; the held combo does not resume
    assert_eq!(h.frontend.iterate(), Mode::Menu);
    assert!(!h.video.video().nonblock_state());
    assert_next_mode(h.frontend.lifecycle(), false, Mode::Menu);

    h.pad.release();
    h.frontend.iterate();
    h.pad.hold(combo);
    assert_eq!(h.frontend.iterate(), Mode::Menu);
    assert_next_mode(h.frontend.lifecycle(), false, Mode::Game);
    assert!(h.video.video().nonblock_state());

    // The core stays frozen until the combo is released
    h.frontend.iterate();
    assert_eq!(h.core.state().frames, 1);
    h.pad.release();
    h.frontend.iterate();
    assert_eq!(h.core.state().frames, 2);
}

#[test]
fn test_hotkeys_fire_once_per_press() {
    let mut h = Harness::new(&["a.nes"], |_| {});
    h.frontend.start(Some(h.path("a.nes")), false);
    h.iterate_n(2);

    h.pad.hold_hotkeys(Commands::SAVE_STATE);
    h.iterate_n(3);
    h.pad.release();
    h.frontend.iterate();
    h.pad.hold_hotkeys(Commands::SAVE_STATE | Commands::STATE_SLOT_PLUS);
    h.frontend.iterate();

    assert_eq!(
        h.core.state().commands,
        [
            Command::SaveState,
            Command::SaveState,
            Command::StateSlotPlus
        ]
    );
}

#[test]
fn test_quit_hotkey_in_game_terminates() {
    let mut h = Harness::new(&["a.nes"], |_| {});
    h.frontend.start(Some(h.path("a.nes")), false);
    h.iterate_n(2);

    h.pad.hold_hotkeys(Commands::QUIT);
    assert_eq!(h.frontend.iterate(), Mode::Game);
    assert!(h.frontend.is_shutdown());
    assert_eq!(h.frontend.iterate(), Mode::Terminated);
}

#[test]
fn test_dead_video_in_menu_terminates() {
    let mut h = Harness::new(&["a.nes"], |_| {});
    h.frontend.start(None, false);
    h.video.video_mut().set_alive(false);

    assert_eq!(h.frontend.run().unwrap(), ExitStatus::Success);
    assert!(h.core.state().requests.is_empty());
}

#[test]
fn test_history_entry_without_content() {
    let mut h = Harness::new(&["a.nes"], |_| {});
    let content = h.path("a.nes");
    {
        let history = h.frontend.menu_mut().history_mut().unwrap();
        history.push(None, Path::new("/cores/other_libretro.so"), "Other");
        history.push(Some(&content), Path::new("/cores/fake_libretro.so"), "Fake");
    }

    assert!(matches!(
        h.frontend.load_history(5),
        Err(FrontendError::HistoryIndex { index: 5, size: 2 })
    ));

    h.frontend.load_history(1).unwrap();
    assert_eq!(h.frontend.iterate(), Mode::LoadGame);

    let core = h.core.state();
    let request = &core.requests[0];
    assert!(request.no_content);
    assert_eq!(request.content_path, None);
    assert_eq!(
        request.core_path,
        Some(PathBuf::from("/cores/other_libretro.so"))
    );
}

#[test]
fn test_history_view_loads_selection() {
    let mut h = Harness::new(&["a.nes", "b.nes"], |_| {});
    let content = h.path("b.nes");
    h.frontend
        .menu_mut()
        .history_mut()
        .unwrap()
        .push(Some(&content), Path::new("/cores/fake_libretro.so"), "Fake");
    h.frontend.start(None, false);

    h.tap(RetroPad::SELECT);
    assert_eq!(h.frontend.menu().view(), MenuView::History);

    h.pad.hold(RetroPad::B);
    h.frontend.iterate();
    assert_next_mode(h.frontend.lifecycle(), false, Mode::LoadGame);
    assert_eq!(h.frontend.content_path(), Some(content.as_path()));
}

#[test]
fn test_archive_is_extracted_before_loading() {
    let mut h = Harness::new(&[], |s| {
        s.paths.extraction_dir = s.browser_directory.as_ref().map(|d| d.join("extracted"));
    });
    let archive = h.path("pack.zip");
    write_zip(&archive, &[("readme.txt", b"hi"), ("mario.nes", b"NES\x1a")]);
    h.frontend.menu_mut().browser_mut().reset().unwrap();
    h.frontend.start(None, false);

    h.tap(RetroPad::B);

    let extracted = h.path("extracted").join("mario.nes");
    assert_eq!(fs::read(&extracted).unwrap(), b"NES\x1a");
    assert_eq!(h.core.state().requests[0].content_path, Some(extracted));

    // History points at the archive, not the extracted file
    let history = h.frontend.menu().history().unwrap();
    assert_eq!(history.get(0).unwrap().content, Some(canonical(&archive)));
}

#[test]
fn test_archive_never_overwrites_user_files() {
    let mut h = Harness::new(&["mario.nes"], |_| {});
    fs::write(h.path("mario.nes"), b"USER").unwrap();
    write_zip(&h.path("pack.zip"), &[("mario.nes", b"ZIPPED")]);
    h.frontend.menu_mut().browser_mut().reset().unwrap();
    h.frontend.start(None, false);

    h.tap(RetroPad::DOWN);
    h.tap(RetroPad::B);
    assert!(h.core.state().initialized);

    let extracted = h.frontend.extracted_content().unwrap().to_path_buf();
    assert_ne!(extracted, h.path("mario.nes"));
    assert_eq!(fs::read(&extracted).unwrap(), b"ZIPPED");
    assert_eq!(fs::read(h.path("mario.nes")).unwrap(), b"USER");

    h.frontend.shutdown().unwrap();
    assert!(!extracted.exists());
    assert_eq!(fs::read(h.path("mario.nes")).unwrap(), b"USER");
}

#[test]
fn test_extracted_content_removed_when_replaced() {
    let mut h = Harness::new(&["a.nes"], |s| {
        s.paths.extraction_dir = s.browser_directory.as_ref().map(|d| d.join("extracted"));
    });
    write_zip(&h.path("pack.zip"), &[("mario.nes", b"NES\x1a")]);
    h.frontend.menu_mut().browser_mut().reset().unwrap();
    h.frontend.start(None, false);

    h.tap(RetroPad::DOWN);
    h.tap(RetroPad::B);
    let extracted = h.path("extracted").join("mario.nes");
    assert!(extracted.exists());

    h.frontend.request_content(h.path("a.nes"));
    assert_eq!(h.frontend.iterate(), Mode::LoadGame);
    assert!(!extracted.exists());
    assert_eq!(h.frontend.extracted_content(), None);
}

#[test]
fn test_history_load_switches_core_info() {
    let mut h = Harness::new(&["a.nes", "sonic.md"], |_| {});
    let content = canonical(&h.path("sonic.md"));
    h.frontend
        .menu_mut()
        .history_mut()
        .unwrap()
        .push(Some(&content), Path::new("/cores/genesis_libretro.so"), "Genesis");

    h.frontend.load_history(0).unwrap();
    assert_eq!(h.frontend.menu().info().library_name, "genesis_libretro");
    assert!(h.frontend.menu().extensions().contains("md"));
    assert_eq!(h.frontend.iterate(), Mode::LoadGame);

    h.frontend.shutdown().unwrap();
    let history = RomHistory::open(h.path("history.txt"), 10).unwrap();
    let entry = history.get(0).unwrap();
    assert_eq!(entry.core_path, PathBuf::from("/cores/genesis_libretro.so"));
    assert_eq!(entry.core_name, "genesis_libretro");
    assert_eq!(history.len(), 1);
}
