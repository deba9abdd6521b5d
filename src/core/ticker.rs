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

//! Ticker text
//!
//! Labels wider than their field scroll back and forth so the whole text can
//! be read without input. One period is made of four bands:
//!
//! ```text
//! [left pause: 2][slide right: overflow][right pause: 2][slide left: overflow]
//! ```
//!
//! where `overflow = len - width`. Unselected labels are truncated with an
//! ellipsis instead. Lengths are counted in characters, not bytes.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::ticker::ticker_line;
//!
//! let label = "Super Mario World (USA)";
//! assert_eq!(ticker_line(label, 10, 0, false), "Super M...");
//! assert_eq!(ticker_line(label, 10, 0, true), "Super Mari");
//! assert_eq!(ticker_line(label, 10, 2, true), "uper Mario");
//! ```

/// Ticks spent paused at each end
const PAUSE_TICKS: u64 = 2;

/// Ellipsis appended to truncated labels
const ELLIPSIS: &str = "...";

/// Character offset of the visible window for a selected label
///
/// # Arguments
///
/// * `len` - Label length in characters
/// * `width` - Field width in characters
/// * `index` - Tick counter
///
/// # Returns
///
/// Offset into the label in `[0, len - width]`; always 0 when the label fits.
pub fn ticker_offset(len: usize, width: usize, index: u64) -> usize {
    if len <= width {
        return 0;
    }

    let overflow = (len - width) as u64;
    let period = 2 * overflow + 2 * PAUSE_TICKS;
    let phase = index % period;

    let left_moving = PAUSE_TICKS + overflow;
    let right_stop = left_moving + PAUSE_TICKS;

    let offset = if phase < PAUSE_TICKS {
        0
    } else if phase < left_moving {
        phase - PAUSE_TICKS + 1
    } else if phase < right_stop {
        overflow
    } else {
        overflow - 1 - (phase - right_stop)
    };

    offset as usize
}

/// Render `label` into a field of `width` characters
///
/// # Arguments
///
/// * `label` - Text to display
/// * `width` - Field width in characters
/// * `index` - Tick counter driving the scroll
/// * `selected` - Whether the label is under the cursor
pub fn ticker_line(label: &str, width: usize, index: u64, selected: bool) -> String {
    let len = label.chars().count();
    if len <= width {
        return label.to_string();
    }

    if !selected {
        let keep = width.saturating_sub(ELLIPSIS.len());
        let mut out: String = label.chars().take(keep).collect();
        // Fields narrower than the ellipsis get a cut-down ellipsis
        out.extend(ELLIPSIS.chars().take(width - keep));
        return out;
    }

    let offset = ticker_offset(len, width, index);
    label.chars().skip(offset).take(width).collect()
}

/// Frame counter feeding [`ticker_line`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Ticker {
    index: u64,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame
    pub fn tick(&mut self) {
        self.index = self.index.wrapping_add(1);
    }

    /// Current counter value
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Render a label at the current tick
    pub fn line(&self, label: &str, width: usize, selected: bool) -> String {
        ticker_line(label, width, self.index, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const LABEL: &str = "Super Mario World (USA)";

    #[test]
    fn test_short_label_unchanged() {
        for index in 0..50 {
            assert_eq!(ticker_line("Zelda", 10, index, true), "Zelda");
            assert_eq!(ticker_line("Zelda", 10, index, false), "Zelda");
        }
    }

    #[test]
    fn test_unselected_truncation() {
        let out = ticker_line(LABEL, 10, 7, false);
        assert_eq!(out, "Super M...");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn test_unselected_tiny_field() {
        assert_eq!(ticker_line(LABEL, 2, 0, false), "..");
        assert_eq!(ticker_line(LABEL, 0, 0, false), "");
    }

    #[test]
    fn test_band_boundaries() {
        // overflow = 13, period = 30
        assert_eq!(ticker_line(LABEL, 10, 0, true), "Super Mari");
        assert_eq!(ticker_line(LABEL, 10, 1, true), "Super Mari");
        assert_eq!(ticker_line(LABEL, 10, 2, true), "uper Mario");
        assert_eq!(ticker_line(LABEL, 10, 14, true), "orld (USA)");
        assert_eq!(ticker_line(LABEL, 10, 15, true), "orld (USA)");
        assert_eq!(ticker_line(LABEL, 10, 16, true), "orld (USA)");
        assert_eq!(ticker_line(LABEL, 10, 17, true), "World (USA"); // offset 12
        assert_eq!(ticker_line(LABEL, 10, 29, true), "Super Mari");
        assert_eq!(ticker_line(LABEL, 10, 30, true), "Super Mari");
    }

    #[test]
    fn test_period_visits_every_window() {
        let width = 10;
        let len = LABEL.chars().count();
        let overflow = len - width;
        let period = (2 * overflow + 4) as u64;

        let offsets: Vec<usize> = (0..period).map(|i| ticker_offset(len, width, i)).collect();

        // Each sliding band visits each of its windows exactly once
        let right: Vec<usize> = offsets[2..2 + overflow].to_vec();
        assert_eq!(right, (1..=overflow).collect::<Vec<_>>());
        let left: Vec<usize> = offsets[4 + overflow..].to_vec();
        assert_eq!(left, (0..overflow).rev().collect::<Vec<_>>());

        let distinct: HashSet<usize> = offsets.into_iter().collect();
        assert_eq!(distinct.len(), overflow + 1);
    }

    #[test]
    fn test_multibyte_labels() {
        let label = "ドラゴンクエストⅤ 天空の花嫁";
        let out = ticker_line(label, 5, 3, true);
        assert_eq!(out.chars().count(), 5);
    }

    #[test]
    fn test_ticker_counter() {
        let mut ticker = Ticker::new();
        ticker.tick();
        ticker.tick();
        assert_eq!(ticker.index(), 2);
        assert_eq!(ticker.line(LABEL, 10, true), "uper Mario");
    }

    proptest! {
        #[test]
        fn prop_selected_output_has_field_width(
            label in "[a-zA-Z0-9 ]{1,64}",
            width in 1usize..40,
            index in any::<u64>(),
        ) {
            let out = ticker_line(&label, width, index, true);
            let expected = label.chars().count().min(width);
            prop_assert_eq!(out.chars().count(), expected);
        }

        #[test]
        fn prop_window_is_substring(
            label in "[a-z]{11,48}",
            index in 0u64..500,
        ) {
            let out = ticker_line(&label, 10, index, true);
            prop_assert!(label.contains(&out));
        }
    }
}
