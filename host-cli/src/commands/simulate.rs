use firmware::indicator::{self, Rgb};
use firmware::sim::{
    CountingWatchdog, MemoryStorage, NoopDelay, RecordingIndicator, RecordingTransport,
    ScriptedButton,
};
use firmware::{
    Config, KeyManager, Outcome, Pass, Peripherals, PlaybackSource, SecretStore, TickCounter,
};
use shared::error::SharedError;
use shared::hid::{KeyboardReport, decode};
use shared::layout::STORE_LEN;

use crate::SimulateArgs;
use crate::image::{self, Image};
use crate::script::{self, Step};

/// Upper bound on passes spent waiting for playback after the script ends.
const DRAIN_PASS_LIMIT: usize = 1_000_000;

type Simulator<'a> = KeyManager<
    MemoryStorage<STORE_LEN>,
    RecordingTransport,
    RecordingIndicator,
    CountingWatchdog,
    ScriptedButton,
    &'a TickCounter,
>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Selected { tick: u16, cursor: usize },
    Playback { tick: u16, source: PlaybackSource },
    Failed { tick: u16 },
}

#[derive(Debug)]
pub struct Report {
    pub events: Vec<Event>,
    pub typed: Vec<u8>,
    pub reports: usize,
    pub passes: usize,
    pub final_cursor: usize,
    pub tick_period_ms: u32,
    pub image_changed: bool,
}

pub fn run(args: &SimulateArgs) -> Result<Report, SharedError> {
    let original = image::read(&args.image)?;
    let config = match &args.config {
        Some(path) => image::read_config(path)?,
        None => Config::default(),
    };
    let steps = script::parse(&args.script)?;

    let (report, image) = simulate(
        original,
        config,
        &steps,
        args.ready_every,
        args.passes_per_tick,
    )?;
    if report.image_changed {
        image::write(&args.image, &image)?;
    }
    Ok(report)
}

/// Run `steps` against `image` and return what the host would have seen plus the final image.
pub fn simulate(
    image: Image,
    config: Config,
    steps: &[Step],
    ready_every: u32,
    passes_per_tick: u32,
) -> Result<(Report, Image), SharedError> {
    let ticks = TickCounter::new();
    let store = SecretStore::new(MemoryStorage::from_bytes(image))
        .map_err(|err| SharedError::Storage(err.to_string()))?;
    let button = if config.button_active_low {
        ScriptedButton::active_low()
    } else {
        ScriptedButton::active_high()
    };
    let io = Peripherals::new(
        RecordingTransport::ready_every(ready_every),
        RecordingIndicator::default(),
        CountingWatchdog::default(),
    );

    let mut gadget: Simulator<'_> = KeyManager::new(&ticks, store, io, button, config);
    gadget.start(&mut NoopDelay::default());

    let mut events = Vec::new();
    let mut passes = 0;
    let passes_per_tick = passes_per_tick.max(1);

    for step in steps {
        gadget.button_mut().set_pressed(step.pressed());
        for _ in 0..step.ticks() {
            for _ in 0..passes_per_tick {
                record(&mut events, gadget.poll());
                passes += 1;
            }
            ticks.advance();
        }
    }

    gadget.button_mut().release();
    let mut drained = 0;
    while gadget.is_playing() {
        if drained == DRAIN_PASS_LIMIT {
            return Err(SharedError::Script {
                step: steps.len(),
                message: "playback did not finish".into(),
            });
        }
        record(&mut events, gadget.poll());
        passes += 1;
        drained += 1;
        if drained.is_multiple_of(passes_per_tick as usize) {
            ticks.advance();
        }
    }

    let final_cursor = gadget.selection().cursor();
    let (store, mut io, _) = gadget.into_parts();
    let sent = io.transport.take_reports();
    let typed = sent
        .iter()
        .filter_map(|bytes| decode(&KeyboardReport::from_bytes(bytes)))
        .collect();
    let final_image = *store.storage().bytes();

    log::debug!("watchdog fed {} times", io.watchdog.feeds());
    let report = Report {
        events,
        typed,
        reports: sent.len(),
        passes,
        final_cursor,
        tick_period_ms: config.tick_period_ms,
        image_changed: final_image != image,
    };
    Ok((report, final_image))
}

pub fn print(report: &Report) {
    for event in &report.events {
        match event {
            Event::Selected { tick, cursor } => println!(
                "{:>7} ms  selected entry {cursor} ({})",
                millis(report, *tick),
                color_name(indicator::color_for(*cursor))
            ),
            Event::Playback { tick, source } => {
                let what = match source {
                    PlaybackSource::Slot(slot) => format!("typing slot {slot}"),
                    PlaybackSource::Regenerated => "regenerated all slots".into(),
                };
                println!("{:>7} ms  {what}", millis(report, *tick));
            }
            Event::Failed { tick } => {
                println!("{:>7} ms  storage failure", millis(report, *tick));
            }
        }
    }

    println!(
        "typed {:?} in {} reports over {} passes",
        String::from_utf8_lossy(&report.typed),
        report.reports,
        report.passes
    );
    println!("entry {} selected", report.final_cursor);
    if report.image_changed {
        println!("image updated");
    }
}

fn record(events: &mut Vec<Event>, pass: Pass) {
    let tick = pass.now.value();
    match pass.outcome {
        Outcome::Selected { cursor } => events.push(Event::Selected { tick, cursor }),
        Outcome::PlaybackStarted(source) => events.push(Event::Playback { tick, source }),
        Outcome::Failed => events.push(Event::Failed { tick }),
        Outcome::NoOp | Outcome::Ignored => {}
    }
}

fn millis(report: &Report, tick: u16) -> u64 {
    u64::from(tick) * u64::from(report.tick_period_ms)
}

fn color_name(color: Rgb) -> &'static str {
    match color {
        indicator::RED => "red",
        indicator::GREEN => "green",
        indicator::BLUE => "blue",
        indicator::YELLOW => "yellow",
        indicator::MAGENTA => "magenta",
        indicator::CYAN => "cyan",
        indicator::WHITE => "white",
        indicator::OFF => "off",
        _ => "custom",
    }
}
