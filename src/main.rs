mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use kuinvaders::controller;
use kuinvaders::driver::{Canvas, FrameDriver, Input, LogicalKey, Sheet, SpriteRect};
use kuinvaders::Settings;

use display::Screen;

// ── Terminal frame driver ─────────────────────────────────────────────────────

/// Frame driver on a raw-mode terminal.
///
/// Input model: every press/repeat event records the frame it arrived on in
/// `key_frame`. On terminals that report releases a key stays held from its
/// press until its release event removes it. Classic terminals only send
/// presses plus OS key repeat, so there a key counts as held while its entry
/// is fresh (within `hold_window` frames) and stays live as long as repeats
/// keep coming.
struct TerminalDriver<W: Write> {
    out: W,
    screen: Screen,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    frame_start: Instant,
    period: Duration,
    hold_window: u64,
    release_events: bool,
    fire_key: char,
    quit: bool,
}

impl<W: Write> TerminalDriver<W> {
    fn new(out: W, settings: &Settings, release_events: bool) -> std::io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(out, settings, release_events, width, height))
    }

    fn with_size(
        out: W,
        settings: &Settings,
        release_events: bool,
        width: u16,
        height: u16,
    ) -> Self {
        Self {
            out,
            screen: Screen::new(width, height, settings.fire_key),
            key_frame: HashMap::new(),
            frame: 0,
            frame_start: Instant::now(),
            period: settings.frame_period(),
            hold_window: settings.hold_window_frames,
            release_events,
            fire_key: settings.fire_key,
            quit: false,
        }
    }

    fn key_down(&self, key: &KeyCode) -> bool {
        match self.key_frame.get(key) {
            None => false,
            Some(_) if self.release_events => true,
            Some(&last) => self.frame.saturating_sub(last) <= self.hold_window,
        }
    }

    fn drain_events(&mut self) -> std::io::Result<()> {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle_event(event)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> std::io::Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.quit = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            self.quit = true;
                        }
                        _ => {}
                    }
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            },
            Event::Resize(width, height) => {
                self.screen.resize(width, height);
                Screen::clear(&mut self.out)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl<W: Write> Input for TerminalDriver<W> {
    fn is_held(&self, key: LogicalKey) -> bool {
        match key {
            LogicalKey::Left => self.key_down(&KeyCode::Left),
            LogicalKey::Right => self.key_down(&KeyCode::Right),
            LogicalKey::Up => self.key_down(&KeyCode::Up),
            LogicalKey::Down => self.key_down(&KeyCode::Down),
            LogicalKey::Fire => {
                self.key_down(&KeyCode::Char(self.fire_key.to_ascii_lowercase()))
                    || self.key_down(&KeyCode::Char(self.fire_key.to_ascii_uppercase()))
                    || self.key_down(&KeyCode::Char(' '))
            }
        }
    }
}

impl<W: Write> Canvas for TerminalDriver<W> {
    fn draw_sprite(&mut self, sheet: Sheet, dst_x: f32, dst_y: f32, src: SpriteRect) {
        self.screen.draw(sheet, dst_x, dst_y, src);
    }
}

impl<W: Write> FrameDriver for TerminalDriver<W> {
    fn tick(&mut self) -> std::io::Result<bool> {
        self.screen.present(&mut self.out)?;

        // Stand-in for vsync: hold each frame for the configured period.
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.period {
            std::thread::sleep(self.period - elapsed);
        }
        self.frame_start = Instant::now();
        self.frame += 1;

        self.drain_events()?;
        Ok(self.quit)
    }
}

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Raw mode for as long as this value lives.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Alternate screen and hidden cursor. Returns whether key-release
/// reporting was enabled (Ghostty, kitty and friends support it).
/// Leaves the alternate screen again if the rest of the setup fails.
fn enter_screen<W: Write>(out: &mut W) -> std::io::Result<bool> {
    out.execute(terminal::EnterAlternateScreen)?;
    let hidden = out.execute(cursor::Hide).map(|_| ());
    if let Err(e) = hidden {
        let _ = out.execute(terminal::LeaveAlternateScreen);
        return Err(e);
    }
    Ok(out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok())
}

fn leave_screen<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = File::create(&settings.log_file)
        .with_context(|| format!("cannot open log file {}", settings.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config_path = Settings::config_path();
    let (settings, config_error) = Settings::load_or_default(&config_path);
    init_logging(&settings)?;
    if let Some(e) = config_error {
        log::warn!("Ignoring settings: {:#}", e);
    }
    log::info!("Kuinvaders starting with {:?}", settings);

    let mut rng = Pcg32::seed_from_u64(settings.seed);

    let mut out = BufWriter::new(stdout());
    let raw_mode = RawMode::enable().context("failed to enable raw mode")?;
    let keyboard_enhanced = enter_screen(&mut out).context("failed to set up the terminal")?;

    let result = TerminalDriver::new(&mut out, &settings, keyboard_enhanced)
        .and_then(|mut driver| controller::run(&mut driver, &mut rng));

    // Always restore the terminal
    leave_screen(&mut out, keyboard_enhanced);
    drop(raw_mode);

    result.context("terminal I/O failed")
}
