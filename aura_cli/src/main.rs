use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use aura_core::config::{Config, ConfigPatch, ConfigStorage, ConfigStore, JsonFileStorage};
use aura_core::constants::DEFAULT_FPS;
use aura_core::debug::default_log_filter;
use aura_core::geometry::{Point, Rect, Viewport};
use aura_core::orb::{OrbPhase, OrbTimings};
use aura_core::session::{RenderSurface, Session, SessionOptions, ShellEvent};
use aura_core::AuraError;

mod surface;

use surface::{JsonLines, Terminal};

#[derive(Parser, Debug)]
#[command(name = "aura")]
#[command(about = "Aura - headless driver for the orb and dock animation core", long_about = None)]
struct Cli {
    /// Log at debug level (same as AURA_DEBUG=1)
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long)]
    in_memory: bool,

    /// Restore default settings before running
    #[arg(long)]
    reset: bool,

    /// Set and persist the animation speed multiplier
    #[arg(long)]
    speed: Option<f32>,

    /// Set and persist the glass intensity (0-1)
    #[arg(long)]
    glass: Option<f32>,

    /// Maximum number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Pace frames on the wall clock instead of simulating time
    #[arg(long)]
    realtime: bool,

    /// Leave the intro to the host; only the fallback timer ends it
    #[arg(long)]
    no_intro: bool,

    /// Send complete_intro after this many milliseconds
    #[arg(long, value_name = "MS")]
    complete_intro_at: Option<u64>,

    /// Start with the dock collapsed
    #[arg(long)]
    collapsed: bool,

    /// Sweep the pointer along the dock
    #[arg(long)]
    sweep: bool,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Dock item labels, comma separated
    #[arg(long, value_delimiter = ',', default_value = "chat,history,settings")]
    items: Vec<String>,

    /// Print one JSON object per frame
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(AuraError::InvalidConfig("--fps must be at least 1".into()).into());
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(AuraError::InvalidConfig("viewport must have a positive size".into()).into());
        }
        for (flag, value) in [("--speed", self.speed), ("--glass", self.glass)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(AuraError::InvalidConfig(format!("{flag} must be a number")).into());
            }
        }
        Ok(())
    }
}

// Dock layout used by the simulated shell.
const ITEM_TOP: f32 = 120.0;
const ITEM_SPACING: f32 = 56.0;
const ITEM_SIZE: f32 = 40.0;
const DOCK_X: f32 = 20.0;
const DOCK_HIT_WIDTH: f32 = 128.0;

fn item_rect(index: usize) -> Rect {
    Rect::new(DOCK_X, ITEM_TOP + ITEM_SPACING * index as f32, ITEM_SIZE, ITEM_SIZE)
}

/// Scripted host input: the intro signal and an optional pointer sweep.
struct Script {
    complete_intro_at: Option<Duration>,
    sweep: Option<(f32, f32)>,
    total_frames: u64,
    item_count: usize,
    hovered: Option<usize>,
}

impl Script {
    fn new(cli: &Cli) -> Self {
        let sweep = (cli.sweep && !cli.items.is_empty()).then(|| {
            let last = item_rect(cli.items.len() - 1);
            (ITEM_TOP - ITEM_SPACING, last.y + last.height + ITEM_SPACING)
        });
        Self {
            complete_intro_at: cli.complete_intro_at.map(Duration::from_millis),
            sweep,
            total_frames: cli.frames,
            item_count: cli.items.len(),
            hovered: None,
        }
    }

    fn layout(&self, session: &mut Session, viewport: Viewport) {
        session.handle(ShellEvent::DockMeasured(Some(Rect::new(
            0.0,
            0.0,
            DOCK_HIT_WIDTH,
            viewport.height,
        ))));
        for index in 0..self.item_count {
            session.handle(ShellEvent::ItemMeasured(index, Some(item_rect(index))));
        }
    }

    fn before_frame(&mut self, session: &mut Session, frame: u64) {
        if let Some(at) = self.complete_intro_at {
            if session.elapsed() >= at {
                debug!(at_ms = at.as_millis() as u64, "scripted complete_intro");
                session.handle(ShellEvent::CompleteIntro);
                self.complete_intro_at = None;
            }
        }

        let Some((from, to)) = self.sweep else {
            return;
        };
        if frame + 1 >= self.total_frames {
            self.hover(session, None);
            session.handle(ShellEvent::PointerLeave);
            return;
        }
        let t = frame as f32 / self.total_frames.max(1) as f32;
        let pointer = Point::new(DOCK_X + ITEM_SIZE / 2.0, from + (to - from) * t);
        session.handle(ShellEvent::PointerMove {
            x: pointer.x,
            y: pointer.y,
        });
        let under = (0..self.item_count).find(|&i| item_rect(i).contains(pointer));
        self.hover(session, under);
    }

    fn hover(&mut self, session: &mut Session, index: Option<usize>) {
        if self.hovered == index {
            return;
        }
        if let Some(prev) = self.hovered {
            session.handle(ShellEvent::ItemLeave(prev));
        }
        if let Some(next) = index {
            session.handle(ShellEvent::ItemEnter(next));
        }
        self.hovered = index;
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(cli: &Cli) -> Result<ConfigStore> {
    if cli.in_memory {
        return Ok(ConfigStore::in_memory());
    }
    let storage = match &cli.config {
        Some(path) => JsonFileStorage::new(path),
        None => JsonFileStorage::at_default_path(),
    };
    if cli.reset {
        let blob = serde_json::to_string_pretty(&Config::default())?;
        storage
            .save(&blob)
            .with_context(|| format!("Failed to reset settings at {}", storage.path().display()))?;
        info!(path = %storage.path().display(), "settings reset");
    }
    Ok(ConfigStore::open(storage))
}

fn print_summary(session: &Session, terminal: &Terminal) {
    let store = session.store();
    let config = store.get();
    println!();
    println!("{}", console::style("Summary").cyan().bold());
    println!(
        "  frames      {} ({}ms)",
        session.frames(),
        session.elapsed().as_millis()
    );
    for (phase, at) in terminal.transitions() {
        println!("  {:<11} at {}ms", phase.to_string(), at.as_millis());
    }
    println!(
        "  speed       ×{:.2}  label fade {}ms",
        config.animation_speed_multiplier,
        session.dock().label_fade(store).as_millis()
    );
    let glass = store.glass_style();
    println!(
        "  glass       blur {:.1}px  background α {:.2}  border α {:.2}",
        glass.blur_px, glass.background_alpha, glass.border_alpha
    );
    let status = if session.phase() == OrbPhase::Docked {
        console::style("docked").green()
    } else {
        console::style("not docked").yellow()
    };
    println!("  orb         {}", status);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.validate()?;

    let store = open_store(&cli)?;
    store.subscribe(|config| {
        debug!(
            speed = config.animation_speed_multiplier,
            glass = config.visual_intensity,
            "settings changed"
        );
    });

    let mut patch = ConfigPatch::new();
    if let Some(speed) = cli.speed {
        patch = patch.animation_speed(speed);
    }
    if let Some(glass) = cli.glass {
        patch = patch.visual_intensity(glass);
    }
    if !patch.is_empty() {
        store.update(patch);
    }

    let viewport = Viewport::new(cli.width, cli.height);
    let timings = if cli.no_intro {
        OrbTimings::host_driven()
    } else {
        OrbTimings::default()
    };
    let mut session = Session::new(
        store,
        SessionOptions {
            viewport,
            timings,
            items: cli.items.clone(),
            collapsed: cli.collapsed,
            ..SessionOptions::default()
        },
    );

    let mut script = Script::new(&cli);
    script.layout(&mut session, viewport);

    let dt = Duration::from_secs_f64(1.0 / f64::from(cli.fps));
    let mut pacer = cli.realtime.then(|| tokio::time::interval(dt));
    let mut terminal = Terminal::new(u64::from(cli.fps / 4).max(1));
    let mut json = JsonLines::stdout();

    for frame in 0..cli.frames {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }
        script.before_frame(&mut session, frame);
        let surface: &mut dyn RenderSurface = if cli.json { &mut json } else { &mut terminal };
        session.render(dt, surface);

        if script.sweep.is_none() && session.phase() == OrbPhase::Docked && session.is_idle() {
            debug!(frame, "docked and idle, stopping early");
            break;
        }
    }

    if !cli.json {
        print_summary(&session, &terminal);
    }
    session.teardown();
    Ok(())
}
