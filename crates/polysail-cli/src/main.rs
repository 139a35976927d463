//! Headless Polysail driver.
//!
//! Runs a session for a fixed number of frames with a scripted helmsman,
//! recording draw calls instead of rendering, and logs how the voyage went.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use polysail_core::persistence::DEFAULT_SAVE_FILE;
use polysail_core::entity::WorldObject;
use polysail_core::resolver::SimEvent;
use polysail_core::{DrawList, GameState, InputSnapshot, KeySet, MenuAction, Session, SimConfig};
use tracing::{debug, info};

/// Frames spent docked before the script sets sail again.
const SHORE_LEAVE_FRAMES: u32 = 120;

/// Frames between tacks in the beating script.
const TACK_FRAMES: u64 = 300;

#[derive(Parser, Debug)]
#[command(version, about = "Sail a headless Polysail voyage", long_about = None)]
struct Args {
    /// World and session seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 3_600)]
    ticks: u64,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from this save instead of a fresh world
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Write the final world to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// How the helmsman handles the boat
    #[arg(long, value_enum, default_value_t = Script::Sail)]
    script: Script,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Unreef and hold the course
    Sail,
    /// Unreef and tack back and forth
    Beat,
    /// Touch nothing
    Idle,
}

impl Script {
    fn keys(self, frame: u64) -> KeySet {
        match self {
            Self::Sail => KeySet::UNREEF,
            Self::Beat if (frame / TACK_FRAMES) % 2 == 0 => KeySet::UNREEF | KeySet::RUDDER_PORT,
            Self::Beat => KeySet::UNREEF | KeySet::RUDDER_STARBOARD,
            Self::Idle => KeySet::empty(),
        }
    }
}

#[derive(Debug, Default)]
struct VoyageLog {
    drawn: usize,
    culled: usize,
    wind_shifts: u32,
    dockings: u32,
    departures: u32,
    bounces: u32,
}

impl VoyageLog {
    fn record(&mut self, event: &SimEvent) {
        debug!(?event, "event");
        match event {
            SimEvent::WindShifted { .. } => self.wind_shifts += 1,
            SimEvent::Docked { .. } => self.dockings += 1,
            SimEvent::Released { .. } => self.departures += 1,
            SimEvent::Bounced { .. } => self.bounces += 1,
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Click on the dock menu's Set Sail button, if it is showing.
fn set_sail_click(session: &Session) -> Option<Vec2> {
    session
        .buttons()
        .iter()
        .find(|b| b.action == MenuAction::SetSail)
        .map(|b| Vec2::new(b.rect.center_x(), b.rect.y + b.rect.height / 2.0))
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let frame_ms = config.frame_ms();
    let dt = config.fixed_dt();

    let save_path = args
        .load
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE));
    let mut session = Session::new(config, args.seed, save_path);

    let action = if args.load.is_some() {
        MenuAction::LoadGame
    } else {
        MenuAction::NewGame
    };
    if session.dispatch(action) != GameState::Playing {
        bail!("could not load {}", session.save_path().display());
    }
    info!(seed = args.seed, ticks = args.ticks, script = ?args.script, "voyage started");

    let mut log = VoyageLog::default();
    let mut canvas = DrawList::new();
    let mut docked_frames = 0;
    let mut now_ms = 0;

    for frame in 0..args.ticks {
        now_ms += frame_ms;

        let docked = session.world().is_some_and(|w| w.boat().is_docked());
        docked_frames = if docked { docked_frames + 1 } else { 0 };
        let click = if docked_frames > SHORE_LEAVE_FRAMES {
            set_sail_click(&session)
        } else {
            None
        };

        let input = InputSnapshot {
            keys: args.script.keys(frame),
            pointer: click,
            click,
        };

        canvas.clear();
        let report = session.frame(&input, now_ms, dt, &mut canvas);
        log.drawn += report.draw.drawn;
        log.culled += report.draw.culled;
        for event in &report.events {
            log.record(event);
        }

        if !session.is_running() || session.state() != GameState::Playing {
            break;
        }
    }

    let Some(world) = session.world() else {
        bail!("session left the game early");
    };
    let boat = world.boat();
    info!(
        frames = world.tick_count(),
        x = boat.position().x,
        y = boat.position().y,
        heading = boat.orientation(),
        speed = boat.speed(),
        docked_at = ?world.docked_island().map(|i| i.display_name()),
        wind_direction = world.wind().direction(),
        wind_speed = world.wind().speed(),
        "voyage finished"
    );
    info!(
        wind_shifts = log.wind_shifts,
        dockings = log.dockings,
        departures = log.departures,
        bounces = log.bounces,
        drawn = log.drawn,
        culled = log.culled,
        "voyage log"
    );

    if let Some(path) = &args.save {
        world
            .snapshot()
            .save_to(path)
            .with_context(|| format!("saving to {}", path.display()))?;
    }

    Ok(())
}
