#![cfg(feature = "sim")]

use firmware::sim::{
    CountingWatchdog, MemoryStorage, NoopDelay, RecordingIndicator, RecordingTransport,
    ScriptedButton,
};
use firmware::{
    Config, KeyManager, Outcome, Peripherals, PlaybackSource, REGENERATED_MESSAGE, SecretStore,
    TickCounter,
};
use shared::hid::{KeyboardReport, MOD_SHIFT_LEFT, decode};
use shared::layout::{SLOT_COUNT, SLOT_LEN, STORE_LEN, is_secret_symbol};

type Gadget<'a> = KeyManager<
    MemoryStorage<STORE_LEN>,
    RecordingTransport,
    RecordingIndicator,
    CountingWatchdog,
    ScriptedButton,
    &'a TickCounter,
>;

fn image() -> MemoryStorage<STORE_LEN> {
    let mut storage = MemoryStorage::<STORE_LEN>::filled(b'x');
    let slot2 = 2 * SLOT_LEN;
    storage.bytes_mut()[slot2..slot2 + SLOT_LEN]
        .copy_from_slice(b"abcXYZ12abcXYZ12abcXYZ12abcXYZ12");
    storage
}

fn gadget(ticks: &TickCounter, transport: RecordingTransport) -> Gadget<'_> {
    let mut gadget = KeyManager::new(
        ticks,
        SecretStore::new(image()).unwrap(),
        Peripherals::new(
            transport,
            RecordingIndicator::default(),
            CountingWatchdog::default(),
        ),
        ScriptedButton::active_low(),
        Config::default(),
    );
    gadget.start(&mut NoopDelay::default());
    gadget
}

/// Hold the button for `ticks` ticks, then release and poll once more.
fn press(gadget: &mut Gadget<'_>, counter: &TickCounter, ticks: u16) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    gadget.button_mut().press();
    for _ in 0..ticks {
        outcomes.push(gadget.poll().outcome);
        counter.advance();
    }
    gadget.button_mut().release();
    outcomes.push(gadget.poll().outcome);
    counter.advance();
    outcomes.retain(|outcome| *outcome != Outcome::NoOp);
    outcomes
}

fn drain(gadget: &mut Gadget<'_>, counter: &TickCounter) {
    let mut passes = 0;
    while gadget.is_playing() {
        gadget.poll();
        counter.advance();
        passes += 1;
        assert!(passes < 10_000, "playback stalled");
    }
}

fn typed(reports: &[[u8; 8]]) -> Vec<u8> {
    reports
        .iter()
        .filter_map(|bytes| decode(&KeyboardReport::from_bytes(bytes)))
        .collect()
}

#[test]
fn third_slot_types_with_shift_on_capitals() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());

    press(&mut gadget, &ticks, 3);
    press(&mut gadget, &ticks, 3);
    assert_eq!(gadget.selection().cursor(), 2);

    let outcomes = press(&mut gadget, &ticks, 12);
    assert_eq!(outcomes, [Outcome::PlaybackStarted(PlaybackSource::Slot(2))]);
    drain(&mut gadget, &ticks);

    let reports = gadget.peripherals().transport.reports();
    assert_eq!(reports.len(), 2 * (SLOT_LEN + 1));
    assert_eq!(&typed(reports)[..9], b"abcXYZ12a");
    assert_eq!(typed(reports).last(), Some(&b'\n'));

    for (report, ch) in reports.iter().step_by(2).zip(b"abcXYZ12") {
        let shifted = report[0] & MOD_SHIFT_LEFT != 0;
        assert_eq!(shifted, ch.is_ascii_uppercase(), "shift for {}", *ch as char);
    }
    assert!(reports.iter().skip(1).step_by(2).all(|report| *report == [0u8; 8]));
}

#[test]
fn cycling_all_entries_returns_to_start() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());

    for _ in 0..=SLOT_COUNT {
        press(&mut gadget, &ticks, 4);
    }

    assert_eq!(gadget.selection().cursor(), 0);
    assert!(gadget.peripherals().transport.reports().is_empty());
}

#[test]
fn long_hold_on_last_entry_regenerates() {
    let ticks = TickCounter::starting_at(1_000);
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());
    let before = *gadget.store().storage().bytes();

    for _ in 0..SLOT_COUNT {
        press(&mut gadget, &ticks, 2);
    }
    let outcomes = press(&mut gadget, &ticks, 55);
    assert_eq!(outcomes, [Outcome::PlaybackStarted(PlaybackSource::Regenerated)]);
    drain(&mut gadget, &ticks);

    let after = gadget.store().storage().bytes();
    for slot in 0..SLOT_COUNT {
        let range = slot * SLOT_LEN..(slot + 1) * SLOT_LEN;
        assert_ne!(after[range.clone()], before[range.clone()], "slot {slot}");
        assert!(after[range].iter().all(|byte| is_secret_symbol(*byte)));
    }
    assert_eq!(
        typed(gadget.peripherals().transport.reports()),
        REGENERATED_MESSAGE
    );
}

#[test]
fn short_hold_on_last_entry_does_nothing() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());
    let before = *gadget.store().storage().bytes();

    for _ in 0..SLOT_COUNT {
        press(&mut gadget, &ticks, 2);
    }
    assert!(press(&mut gadget, &ticks, 20).is_empty());

    assert_eq!(gadget.store().storage().bytes(), &before);
    assert_eq!(gadget.selection().cursor(), SLOT_COUNT);
}

#[test]
fn busy_transport_loses_nothing() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::ready_every(7));

    press(&mut gadget, &ticks, 2);
    press(&mut gadget, &ticks, 2);
    press(&mut gadget, &ticks, 12);
    drain(&mut gadget, &ticks);

    let reports = gadget.peripherals().transport.reports();
    assert_eq!(reports.len(), 2 * (SLOT_LEN + 1));
    let text = typed(reports);
    assert_eq!(&text[..SLOT_LEN], b"abcXYZ12abcXYZ12abcXYZ12abcXYZ12");
}

#[test]
fn stalled_transport_resumes_at_same_character() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());
    press(&mut gadget, &ticks, 2);
    press(&mut gadget, &ticks, 2);

    gadget.button_mut().press();
    for _ in 0..=11 {
        gadget.poll();
        ticks.advance();
    }
    gadget.button_mut().release();
    // Confirm pass pressed 'a', the next pass released it.
    assert_eq!(gadget.peripherals().transport.reports().len(), 2);

    gadget.peripherals_mut().transport.set_ready(false);
    for _ in 0..100 {
        gadget.poll();
        ticks.advance();
    }
    assert_eq!(gadget.peripherals().transport.reports().len(), 2);
    assert!(gadget.is_playing());

    gadget.peripherals_mut().transport.set_ready(true);
    drain(&mut gadget, &ticks);
    let text = typed(gadget.peripherals().transport.reports());
    assert_eq!(&text[..3], b"abc");
}

#[test]
fn watchdog_fed_every_pass_and_during_settle() {
    let ticks = TickCounter::new();
    let mut gadget = gadget(&ticks, RecordingTransport::always_ready());
    let after_start = gadget.peripherals().watchdog.feeds();
    assert_eq!(after_start, 250);

    for _ in 0..40 {
        gadget.poll();
    }
    assert_eq!(gadget.peripherals().watchdog.feeds(), after_start + 40);
}
