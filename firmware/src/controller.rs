//! Selection cursor and playback state machine.
//!
//! The controller reacts to one gesture per pass while idle. Once playback starts it ignores the
//! button until the last release report has gone out.
use core::fmt::Debug;

use embedded_storage::{ReadStorage, Storage};
use heapless::Vec as HeaplessVec;
use shared::layout::{SLOT_COUNT, SLOT_LEN};
use zeroize::Zeroize;

use crate::gesture::{Gesture, Target};
use crate::hid::{HidTransport, KeystrokeTransmitter};
use crate::indicator::{Indicator, Rgb, color_for};
use crate::storage::SecretStore;
use crate::system::{Peripherals, Watchdog};
use crate::tick::Tick;

/// Slot content plus the newline appended for playback.
pub const PLAYBACK_CAPACITY: usize = SLOT_LEN + 1;

/// Cursor over the slots plus the trailing regenerate entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    cursor: usize,
}

impl Selection {
    pub const ENTRIES: usize = SLOT_COUNT + 1;

    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % Self::ENTRIES;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn slot(&self) -> Option<usize> {
        (self.cursor < SLOT_COUNT).then_some(self.cursor)
    }

    pub fn target(&self) -> Target {
        match self.slot() {
            Some(_) => Target::Slot,
            None => Target::Regenerate,
        }
    }

    pub fn color(&self) -> Rgb {
        color_for(self.cursor)
    }
}

/// Bytes being typed. Zeroed when playback ends.
#[derive(Debug)]
pub struct PlaybackBuffer {
    bytes: HeaplessVec<u8, PLAYBACK_CAPACITY>,
}

impl PlaybackBuffer {
    pub fn from_slot(content: &[u8; SLOT_LEN]) -> Self {
        let mut bytes = HeaplessVec::new();
        // Capacity is SLOT_LEN + 1, so neither push can fail.
        let _ = bytes.extend_from_slice(content);
        let _ = bytes.push(b'\n');
        Self { bytes }
    }

    pub fn from_message(message: &[u8]) -> Option<Self> {
        let bytes = HeaplessVec::from_slice(message).ok()?;
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn zeroize_contents(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }

    fn wipe(&mut self) {
        self.zeroize_contents();
        self.bytes.clear();
    }
}

impl Drop for PlaybackBuffer {
    fn drop(&mut self) {
        self.wipe();
    }
}

#[derive(Debug)]
struct Playback {
    buffer: PlaybackBuffer,
    position: usize,
    release_pending: bool,
}

#[derive(Debug, Default)]
enum ControllerState {
    #[default]
    Idle,
    Playing(Playback),
}

/// Where the bytes being played came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackSource {
    Slot(usize),
    Regenerated,
}

/// Result of handing one gesture to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do for this gesture.
    NoOp,
    /// A gesture arrived during playback and was dropped.
    Ignored,
    Selected { cursor: usize },
    PlaybackStarted(PlaybackSource),
    /// The gesture was valid but the store failed; the controller stayed idle.
    Failed,
}

/// Result of one encoder step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Idle,
    /// Transport was busy; the same report is retried next pass.
    Blocked,
    Pressed(u8),
    Released,
    Finished,
}

#[derive(Debug, Default)]
pub struct Controller {
    selection: Selection,
    state: ControllerState,
    reset_selection_after_playback: bool,
}

impl Controller {
    pub fn new(reset_selection_after_playback: bool) -> Self {
        Self {
            selection: Selection::new(),
            state: ControllerState::Idle,
            reset_selection_after_playback,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, ControllerState::Playing(_))
    }

    /// Bytes still queued for playback, starting at the next character to press.
    pub fn pending(&self) -> &[u8] {
        match &self.state {
            ControllerState::Idle => &[],
            ControllerState::Playing(playback) => {
                let offset = playback.position + usize::from(playback.release_pending);
                playback.buffer.as_bytes().get(offset..).unwrap_or(&[])
            }
        }
    }

    pub fn dispatch<S, T, I, W>(
        &mut self,
        gesture: Gesture,
        now: Tick,
        store: &mut SecretStore<S>,
        io: &mut Peripherals<T, I, W>,
    ) -> Outcome
    where
        S: ReadStorage + Storage,
        S::Error: Debug,
        T: HidTransport,
        I: Indicator,
        W: Watchdog,
    {
        if self.is_playing() {
            if gesture != Gesture::None {
                log::debug!("ignoring {gesture:?} during playback");
                return Outcome::Ignored;
            }
            return Outcome::NoOp;
        }

        match gesture {
            Gesture::None => Outcome::NoOp,
            Gesture::HoldSelect => {
                log::debug!("hold released before confirm");
                Outcome::NoOp
            }
            Gesture::Tap => {
                self.selection.advance();
                io.indicator.show(self.selection.color());
                log::info!("selected entry {}", self.selection.cursor());
                Outcome::Selected {
                    cursor: self.selection.cursor(),
                }
            }
            Gesture::HoldConfirm(target) if target != self.selection.target() => {
                log::warn!(
                    "{target:?} confirm does not match entry {}",
                    self.selection.cursor()
                );
                Outcome::NoOp
            }
            Gesture::HoldConfirm(Target::Slot) => self.start_slot(store),
            Gesture::HoldConfirm(Target::Regenerate) => self.start_regenerate(now, store, io),
        }
    }

    /// Move playback forward by at most one report.
    pub fn step<T, I, W>(
        &mut self,
        transmitter: &mut KeystrokeTransmitter,
        io: &mut Peripherals<T, I, W>,
    ) -> Step
    where
        T: HidTransport,
        I: Indicator,
        W: Watchdog,
    {
        let ControllerState::Playing(playback) = &mut self.state else {
            return Step::Idle;
        };

        let step = if playback.release_pending {
            if !transmitter.release_key(&mut io.transport) {
                return Step::Blocked;
            }
            playback.release_pending = false;
            playback.position += 1;
            if playback.position >= playback.buffer.len() {
                Step::Finished
            } else {
                Step::Released
            }
        } else {
            match playback.buffer.as_bytes().get(playback.position).copied() {
                Some(ch) => {
                    if !transmitter.send_key(&mut io.transport, ch) {
                        return Step::Blocked;
                    }
                    playback.release_pending = true;
                    Step::Pressed(ch)
                }
                None => Step::Finished,
            }
        };

        if step == Step::Finished {
            self.finish(&mut io.indicator);
        }
        step
    }

    fn start_slot<S>(&mut self, store: &mut SecretStore<S>) -> Outcome
    where
        S: ReadStorage + Storage,
        S::Error: Debug,
    {
        let Some(slot) = self.selection.slot() else {
            return Outcome::NoOp;
        };

        match store.read(slot) {
            Ok(content) => {
                log::info!("typing slot {slot}");
                self.play(PlaybackBuffer::from_slot(&content));
                Outcome::PlaybackStarted(PlaybackSource::Slot(slot))
            }
            Err(error) => {
                log::error!("failed to read slot {slot}: {error}");
                Outcome::Failed
            }
        }
    }

    fn start_regenerate<S, T, I, W>(
        &mut self,
        now: Tick,
        store: &mut SecretStore<S>,
        io: &mut Peripherals<T, I, W>,
    ) -> Outcome
    where
        S: ReadStorage + Storage,
        S::Error: Debug,
        W: Watchdog,
    {
        let message = match store.regenerate_all(now, &mut io.watchdog) {
            Ok(message) => message,
            Err(error) => {
                log::error!("regenerate failed: {error}");
                return Outcome::Failed;
            }
        };

        match PlaybackBuffer::from_message(message) {
            Some(buffer) => {
                self.play(buffer);
                Outcome::PlaybackStarted(PlaybackSource::Regenerated)
            }
            None => {
                log::error!("status message exceeds playback buffer");
                Outcome::Failed
            }
        }
    }

    fn play(&mut self, buffer: PlaybackBuffer) {
        self.state = ControllerState::Playing(Playback {
            buffer,
            position: 0,
            release_pending: false,
        });
    }

    fn finish<I: Indicator>(&mut self, indicator: &mut I) {
        self.state = ControllerState::Idle;
        log::info!("playback finished");
        if self.reset_selection_after_playback {
            self.selection.reset();
            indicator.show(self.selection.color());
        }
    }
}
