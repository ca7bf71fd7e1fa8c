use std::cell::Cell;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use star_arcade::config::{Difficulty, GameConfig};
use star_arcade::engine::{Engine, EngineHooks};
use star_arcade::input::{ChannelInput, FireKind, InputEvent};
use star_arcade::surface::{self, TerminalSurface};

#[derive(Parser, Debug)]
#[command(name = "star_arcade", about = "Terminal arcade shooter with a boss fight")]
struct Args {
    /// TOML file overriding gameplay constants.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Kills needed to summon the boss.
    #[arg(long)]
    boss_threshold: Option<u32>,

    /// Seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "star_arcade.log")]
    log_file: PathBuf,

    /// Do not write a log file.
    #[arg(long)]
    no_log: bool,

    #[arg(long, default_value_t = 60)]
    fps: u32,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_logging(args: &Args) -> Result<()> {
    if args.no_log {
        return Ok(());
    }
    let file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Device mapping ────────────────────────────────────────────────────────────

/// Cell size in world pixels, shared with the reader thread.
#[derive(Clone, Copy)]
struct CellSize {
    w: f32,
    h: f32,
}

impl CellSize {
    fn center(self, col: u16, row: u16) -> (f32, f32) {
        surface::cell_center(col, row, self.w, self.h)
    }
}

enum Mapped {
    Game(InputEvent),
    Quit,
    Ignore,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Mapped {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Mapped::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Mapped::Quit,
        KeyCode::Char(' ') => Mapped::Game(InputEvent::Fire(FireKind::Primary)),
        KeyCode::Char('x') | KeyCode::Char('X') => {
            Mapped::Game(InputEvent::Fire(FireKind::Secondary))
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Mapped::Game(InputEvent::Reset),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Mapped::Game(InputEvent::Nudge { dx: -1, dy: 0 })
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Mapped::Game(InputEvent::Nudge { dx: 1, dy: 0 })
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Mapped::Game(InputEvent::Nudge { dx: 0, dy: -1 })
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Mapped::Game(InputEvent::Nudge { dx: 0, dy: 1 })
        }
        _ => Mapped::Ignore,
    }
}

fn map_mouse(mouse: MouseEvent, cell: CellSize) -> Mapped {
    let (x, y) = cell.center(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            Mapped::Game(InputEvent::PointerMove { x, y })
        }
        MouseEventKind::Down(MouseButton::Left) => Mapped::Game(InputEvent::FireAt {
            x,
            y,
            kind: FireKind::Primary,
        }),
        MouseEventKind::Down(MouseButton::Right) => Mapped::Game(InputEvent::FireAt {
            x,
            y,
            kind: FireKind::Secondary,
        }),
        _ => Mapped::Ignore,
    }
}

fn map_event(ev: Event, cell: CellSize) -> Mapped {
    match ev {
        // Release events only arrive with keyboard enhancement; they carry no intent
        Event::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => Mapped::Ignore,
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => map_key(code, modifiers),
        Event::Mouse(mouse) => map_mouse(mouse, cell),
        Event::Resize(cols, rows) => Mapped::Game(InputEvent::Resize {
            width: cols as f32 * cell.w,
            height: rows as f32 * cell.h,
        }),
        _ => Mapped::Ignore,
    }
}

/// Dedicate a thread to blocking event reads so the frame loop never blocks
/// on I/O. Game events go through the channel, quit through the flag.
fn spawn_reader(tx: mpsc::Sender<InputEvent>, quit: Arc<AtomicBool>, cell: CellSize) {
    thread::spawn(move || loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(_) => break,
        };
        match map_event(ev, cell) {
            Mapped::Game(input) => {
                if tx.send(input).is_err() {
                    break; // receiver dropped → engine destroyed
                }
            }
            Mapped::Quit => {
                quit.store(true, Ordering::SeqCst);
                break;
            }
            Mapped::Ignore => {}
        }
    });
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Scoreboard {
    kills: Cell<u32>,
    best: Cell<u32>,
    resets: Cell<u32>,
}

fn run<W: Write>(out: W, config: GameConfig, args: &Args, board: Rc<Scoreboard>) -> Result<()> {
    let (cols, rows) = terminal::size().context("cannot query terminal size")?;
    let cell = CellSize {
        w: config.cell_width_px,
        h: config.cell_height_px,
    };
    let surface = TerminalSurface::new(out, cols, rows, cell.w, cell.h);

    let kills_board = Rc::clone(&board);
    let reset_board = Rc::clone(&board);
    let hooks = EngineHooks::new()
        .on_kill(move |ev| {
            kills_board.kills.set(ev.kills);
            if ev.kills > kills_board.best.get() {
                kills_board.best.set(ev.kills);
            }
        })
        .on_reset(move || reset_board.resets.set(reset_board.resets.get() + 1));

    let mut engine = match args.seed {
        Some(seed) => Engine::with_rng(surface, config, hooks, StdRng::seed_from_u64(seed)),
        None => Engine::new(surface, config, hooks),
    };
    engine.set_hud_label(args.difficulty.label());

    let (tx, rx) = mpsc::channel();
    let quit = Arc::new(AtomicBool::new(false));
    spawn_reader(tx, Arc::clone(&quit), cell);
    engine.attach_input(ChannelInput::new(rx));

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let result = (|| -> Result<()> {
        while engine.is_running() && !quit.load(Ordering::SeqCst) {
            let frame_start = Instant::now();
            engine.pump_inputs();
            engine.tick(frame_start).context("frame failed")?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }
        }
        Ok(())
    })();

    engine.destroy();
    result
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = GameConfig::load(args.config.as_deref()).context("loading config")?;
    args.difficulty.apply(&mut config);
    if let Some(threshold) = args.boss_threshold {
        config.boss_kill_threshold = threshold;
    }
    config.validate().context("validating config")?;
    info!(difficulty = %args.difficulty, threshold = config.boss_kill_threshold, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let board = Rc::new(Scoreboard::default());
    let result = run(out, config, &args, Rc::clone(&board));

    // Always restore the terminal
    let mut restore = stdout();
    if keyboard_enhanced {
        let _ = restore.execute(PopKeyboardEnhancementFlags);
    }
    let _ = restore.execute(DisableMouseCapture);
    let _ = restore.execute(cursor::Show);
    let _ = restore.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    println!(
        "Kills: {}   Best this session: {}   Resets: {}",
        board.kills.get(),
        board.best.get(),
        board.resets.get()
    );
    Ok(())
}
