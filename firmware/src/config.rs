//! Timing and policy knobs. `Config::default()` gives the stock gadget behaviour.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Duration bands, in ticks, used to classify a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GestureTiming {
    /// Releases at or below this many ticks are contact bounce.
    pub tap_min_ticks: u16,
    /// Longest release still counted as a tap.
    pub tap_max_ticks: u16,
    /// Hold on a slot that starts playback.
    pub confirm_ticks: u16,
    /// Hold on the regenerate selection that rewrites every slot.
    pub regenerate_ticks: u16,
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self {
            tap_min_ticks: 1,
            tap_max_ticks: 10,
            confirm_ticks: 10,
            regenerate_ticks: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Config {
    pub timing: GestureTiming,
    /// Return the selection to slot 0 once playback finishes.
    pub reset_selection_after_playback: bool,
    /// The button pulls the input pin to ground when pressed.
    pub button_active_low: bool,
    /// USB re-enumeration settle time at start-up.
    pub settle_ms: u32,
    /// Nominal tick period. The firmware never reads it; host tools use it to label timings.
    pub tick_period_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: GestureTiming::default(),
            reset_selection_after_playback: false,
            button_active_low: true,
            settle_ms: 500,
            tick_period_ms: 100,
        }
    }
}
