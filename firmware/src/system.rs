//! The polling pipeline: one pass feeds the watchdog, services USB, samples the button, and moves
//! the controller forward by at most one report.
use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_storage::{ReadStorage, Storage};

use crate::config::Config;
use crate::controller::{Controller, Outcome, Selection, Step};
use crate::gesture::{Gesture, GestureClassifier};
use crate::hid::{HidTransport, KeystrokeTransmitter};
use crate::indicator::Indicator;
use crate::storage::SecretStore;
use crate::tick::{Tick, TickSource};

/// Granularity of the start-up settle wait.
pub const SETTLE_STEP_MS: u32 = 2;

/// Hardware watchdog. Must be fed more often than its timeout.
pub trait Watchdog {
    fn feed(&mut self);
}

impl<W: Watchdog + ?Sized> Watchdog for &mut W {
    fn feed(&mut self) {
        (**self).feed()
    }
}

/// Output devices shared by the controller and the pipeline.
#[derive(Debug, Default)]
pub struct Peripherals<T, I, W> {
    pub transport: T,
    pub indicator: I,
    pub watchdog: W,
}

impl<T, I, W> Peripherals<T, I, W> {
    pub fn new(transport: T, indicator: I, watchdog: W) -> Self {
        Self {
            transport,
            indicator,
            watchdog,
        }
    }
}

/// What happened during one polling pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pass {
    pub now: Tick,
    pub gesture: Gesture,
    pub outcome: Outcome,
    pub step: Step,
}

pub struct KeyManager<S, T, I, W, B, K> {
    ticks: K,
    store: SecretStore<S>,
    io: Peripherals<T, I, W>,
    button: B,
    config: Config,
    classifier: GestureClassifier,
    controller: Controller,
    transmitter: KeystrokeTransmitter,
}

impl<S, T, I, W, B, K> KeyManager<S, T, I, W, B, K>
where
    S: ReadStorage + Storage,
    S::Error: Debug,
    T: HidTransport,
    I: Indicator,
    W: Watchdog,
    B: InputPin,
    K: TickSource,
{
    pub fn new(
        ticks: K,
        store: SecretStore<S>,
        io: Peripherals<T, I, W>,
        button: B,
        config: Config,
    ) -> Self {
        Self {
            ticks,
            store,
            io,
            button,
            classifier: GestureClassifier::new(config.timing),
            controller: Controller::new(config.reset_selection_after_playback),
            transmitter: KeystrokeTransmitter::new(),
            config,
        }
    }

    /// Force the host to re-enumerate, then light the LED for the initial selection.
    pub fn start<D: DelayNs + ?Sized>(&mut self, delay: &mut D) {
        self.io.transport.detach();
        for _ in 0..self.config.settle_ms / SETTLE_STEP_MS {
            self.io.watchdog.feed();
            delay.delay_ms(SETTLE_STEP_MS);
        }
        self.io.transport.attach();

        let selection = self.controller.selection();
        self.io.indicator.show(selection.color());
        log::info!("ready, entry {} selected", selection.cursor());
    }

    pub fn poll(&mut self) -> Pass {
        self.io.watchdog.feed();
        self.io.transport.poll();

        let now = self.ticks.now();
        let pressed = self.button_pressed();
        let target = self.controller.selection().target();
        let gesture = self.classifier.update(pressed, now, target);

        let outcome = self
            .controller
            .dispatch(gesture, now, &mut self.store, &mut self.io);
        let step = self.controller.step(&mut self.transmitter, &mut self.io);

        Pass {
            now,
            gesture,
            outcome,
            step,
        }
    }

    pub fn selection(&self) -> Selection {
        self.controller.selection()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn store(&self) -> &SecretStore<S> {
        &self.store
    }

    pub fn peripherals(&self) -> &Peripherals<T, I, W> {
        &self.io
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<T, I, W> {
        &mut self.io
    }

    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }

    pub fn into_parts(self) -> (SecretStore<S>, Peripherals<T, I, W>, B) {
        (self.store, self.io, self.button)
    }

    fn button_pressed(&mut self) -> bool {
        let level = if self.config.button_active_low {
            self.button.is_low()
        } else {
            self.button.is_high()
        };

        match level {
            Ok(pressed) => pressed,
            Err(error) => {
                log::warn!("button read failed: {error:?}");
                false
            }
        }
    }
}
