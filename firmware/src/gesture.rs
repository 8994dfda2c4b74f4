//! Turns the sampled button level into discrete gestures.
use crate::config::GestureTiming;
use crate::tick::Tick;

/// What the current selection would do on a confirmed hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Slot,
    Regenerate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    None,
    /// Short press and release.
    Tap,
    /// Hold released past the tap band without reaching a confirm threshold.
    HoldSelect,
    /// Hold reached the threshold for `Target`. Emitted while the button is still down.
    HoldConfirm(Target),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed { start: Tick, confirmed: bool },
}

#[derive(Debug)]
pub struct GestureClassifier {
    timing: GestureTiming,
    state: PressState,
}

impl GestureClassifier {
    pub fn new(timing: GestureTiming) -> Self {
        Self {
            timing,
            state: PressState::Idle,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }

    /// Feed one sample of the button level. Call exactly once per polling pass.
    pub fn update(&mut self, pressed: bool, now: Tick, target: Target) -> Gesture {
        match (self.state, pressed) {
            (PressState::Idle, false) => Gesture::None,
            (PressState::Idle, true) => {
                self.state = PressState::Pressed {
                    start: now,
                    confirmed: false,
                };
                Gesture::None
            }
            (PressState::Pressed { start, confirmed }, true) => {
                if confirmed || now.since(start) < self.threshold(target) {
                    return Gesture::None;
                }
                self.state = PressState::Pressed {
                    start,
                    confirmed: true,
                };
                Gesture::HoldConfirm(target)
            }
            (PressState::Pressed { start, confirmed }, false) => {
                self.state = PressState::Idle;
                self.classify_release(now.since(start), confirmed)
            }
        }
    }

    fn threshold(&self, target: Target) -> u16 {
        match target {
            Target::Slot => self.timing.confirm_ticks,
            Target::Regenerate => self.timing.regenerate_ticks,
        }
    }

    fn classify_release(&self, held: u16, confirmed: bool) -> Gesture {
        if confirmed || held <= self.timing.tap_min_ticks {
            Gesture::None
        } else if held <= self.timing.tap_max_ticks {
            Gesture::Tap
        } else {
            Gesture::HoldSelect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureTiming::default())
    }

    /// Press at `from`, sample every tick while held, release at `from + held`.
    fn press(
        classifier: &mut GestureClassifier,
        from: u16,
        held: u16,
        target: Target,
    ) -> heapless::Vec<Gesture, 8> {
        let mut emitted = heapless::Vec::new();
        for offset in 0..=held {
            let tick = Tick(from.wrapping_add(offset));
            let gesture = classifier.update(offset < held, tick, target);
            if gesture != Gesture::None {
                emitted.push(gesture).unwrap();
            }
        }
        emitted
    }

    #[test]
    fn bounce_is_ignored() {
        let mut classifier = classifier();
        assert!(press(&mut classifier, 0, 1, Target::Slot).is_empty());
        assert!(press(&mut classifier, 5, 0, Target::Slot).is_empty());
    }

    #[test]
    fn short_press_is_a_tap() {
        let mut classifier = classifier();
        assert_eq!(press(&mut classifier, 0, 2, Target::Slot), [Gesture::Tap]);
        assert_eq!(press(&mut classifier, 20, 9, Target::Regenerate), [Gesture::Tap]);
    }

    #[test]
    fn slot_hold_confirms_once_while_held() {
        let mut classifier = classifier();
        let mut emitted = heapless::Vec::<_, 4>::new();
        for tick in 0..40u16 {
            let gesture = classifier.update(true, Tick(tick), Target::Slot);
            if gesture != Gesture::None {
                emitted.push((tick, gesture)).unwrap();
            }
        }
        assert_eq!(emitted, [(10, Gesture::HoldConfirm(Target::Slot))]);
        assert_eq!(classifier.update(false, Tick(41), Target::Slot), Gesture::None);
        assert!(!classifier.is_pressed());
    }

    #[test]
    fn regenerate_needs_the_long_threshold() {
        let mut classifier = classifier();
        assert_eq!(
            press(&mut classifier, 0, 60, Target::Regenerate),
            [Gesture::HoldConfirm(Target::Regenerate)]
        );
    }

    #[test]
    fn abandoned_regenerate_hold_is_hold_select() {
        let mut classifier = classifier();
        assert_eq!(
            press(&mut classifier, 0, 30, Target::Regenerate),
            [Gesture::HoldSelect]
        );
    }

    #[test]
    fn press_across_counter_wrap() {
        let mut classifier = classifier();
        assert_eq!(
            press(&mut classifier, u16::MAX - 1, 4, Target::Slot),
            [Gesture::Tap]
        );
        assert_eq!(
            press(&mut classifier, u16::MAX - 3, 12, Target::Slot),
            [Gesture::HoldConfirm(Target::Slot)]
        );
    }

    #[test]
    fn release_on_threshold_pass_is_still_a_tap() {
        let mut classifier = classifier();
        assert_eq!(classifier.update(true, Tick(0), Target::Slot), Gesture::None);
        assert_eq!(classifier.update(false, Tick(10), Target::Slot), Gesture::Tap);
    }
}
