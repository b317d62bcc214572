use crate::keys::collect_input_nonblocking;
use crate::render::{draw_session, Palette, Terminal};
use anyhow::Context;
use pocketpet::clock::{HourSource, MonotonicClock};
use pocketpet::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use pocketpet::dice::{Dice, SeededDice};
use pocketpet::model::Rules;
use pocketpet::session::Session;
use pocketpet::storage::FileStore;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// Keeps the mini-game stream apart from the pet's when a seed is fixed.
const GAME_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    session: Session,
    clock: MonotonicClock,
    hours: HourSource,
    term: Terminal,
    should_quit: bool,
}

fn init_logging(paths: &Paths, settings: &Settings) -> anyhow::Result<()> {
    let file = File::create(&paths.log_path)
        .with_context(|| format!("could not open log file {}", paths.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

fn make_dice(seed: u64) -> (Box<dyn Dice>, Box<dyn Dice>) {
    if seed == 0 {
        (
            Box::new(SeededDice::from_entropy()),
            Box::new(SeededDice::from_entropy()),
        )
    } else {
        (
            Box::new(SeededDice::from_seed(seed)),
            Box::new(SeededDice::from_seed(seed ^ GAME_SEED_SALT)),
        )
    }
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);
        init_logging(&paths, &settings)?;
        info!(save = %paths.save_path.display(), seed = settings.seed, "pocketpet starting");

        let (sim_dice, game_dice) = make_dice(settings.seed);
        let store = FileStore::open(&paths.save_path);
        let session = Session::new(Rules::default(), sim_dice, game_dice, Box::new(store));
        let hours = if settings.synthetic_clock {
            HourSource::Synthetic
        } else {
            HourSource::WallClock
        };

        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            paths,
            session,
            clock: MonotonicClock::start(),
            hours,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let palette = Palette::new(self.settings.enable_color);

        while !self.should_quit {
            let frame_start = Instant::now();
            self.term.resize_if_needed()?;

            let input = collect_input_nonblocking(frame_dt)?;
            if input.quit {
                self.should_quit = true;
                break;
            }

            let now = self.clock.now();
            let hour = self.hours.hour(now);
            self.session.tick(&input.buttons, now, hour);

            let sounds = self.session.drain_sounds();
            for s in &sounds {
                debug!(effect = s.name(), "sound");
            }
            if self.settings.enable_sound && sounds.iter().any(|s| s.is_alert()) {
                self.term.bell()?;
            }

            draw_session(&mut self.term.cur, &self.session, now, palette);
            self.term.present()?;

            pace_frame(frame_dt, frame_start);
        }
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.session.save_if_active(self.clock.now());
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        info!("pocketpet stopped");
        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    let result = app.run();
    app.shutdown()?;
    result
}

/// Sleeps off whatever is left of the frame budget.
fn pace_frame(budget: Duration, frame_start: Instant) {
    if let Some(left) = budget.checked_sub(frame_start.elapsed()) {
        std::thread::sleep(left);
    }
}
