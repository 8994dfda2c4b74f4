use core::sync::atomic::{AtomicU16, Ordering};

/// One reading of the tick counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick(pub u16);

impl Tick {
    /// Ticks elapsed since `earlier`, correct across a single counter wrap.
    pub fn since(self, earlier: Tick) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

/// Anything the polling loop can read the current tick from.
pub trait TickSource {
    fn now(&self) -> Tick;
}

/// Counter shared between the timer interrupt and the polling loop.
///
/// The interrupt only calls [`TickCounter::advance`]. The loop reads it once per pass.
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: AtomicU16,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU16::new(0),
        }
    }

    pub const fn starting_at(value: u16) -> Self {
        Self {
            ticks: AtomicU16::new(value),
        }
    }

    /// Interrupt side: one period elapsed.
    pub fn advance(&self) {
        self.advance_by(1);
    }

    /// Single writer only. Plain load and store keep this buildable on cores without
    /// read-modify-write atomics.
    pub fn advance_by(&self, ticks: u16) {
        let next = self.ticks.load(Ordering::Relaxed).wrapping_add(ticks);
        self.ticks.store(next, Ordering::Relaxed);
    }
}

impl TickSource for TickCounter {
    fn now(&self) -> Tick {
        Tick(self.ticks.load(Ordering::Relaxed))
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_zero() {
        let counter = TickCounter::new();
        counter.advance();
        counter.advance_by(4);
        assert_eq!(counter.now(), Tick(5));
    }

    #[test]
    fn elapsed_survives_wrap() {
        let counter = TickCounter::starting_at(u16::MAX - 2);
        let start = counter.now();
        counter.advance_by(7);
        assert_eq!(counter.now(), Tick(4));
        assert_eq!(counter.now().since(start), 7);
    }

    #[test]
    fn single_steps_wrap_to_zero() {
        let counter = TickCounter::starting_at(u16::MAX - 1);
        counter.advance();
        assert_eq!(counter.now(), Tick(u16::MAX));
        counter.advance();
        assert_eq!(counter.now(), Tick(0));
        counter.advance();
        assert_eq!(counter.now(), Tick(1));
    }
}
