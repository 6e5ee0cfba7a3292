mod chars;
mod cli;
mod layer;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use confetti_anim::{AnimationStatus, Confetti};
use confetti_config::{Config, ConfigError};
use confetti_core::{ConfettiOptions, Point};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use directories::ProjectDirs;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect, Size},
    style::{Color, Stylize},
    text::Line,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::layer::{ConfettiLayer, viewport};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = init_logging()?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Err(ConfigError::NoConfigDir) => Config::default(),
            loaded => loaded?,
        },
    };
    cli.apply(&mut config);

    if cli.save_config {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("saved {}", path.display());
        return Ok(());
    }

    info!(log = ?log_path, "starting confetti");
    let terminal = ratatui::init();
    let result = run(terminal, config, cli.cannons);
    ratatui::restore();
    result
}

fn run(terminal: DefaultTerminal, config: Config, cannons: bool) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    App::new(config, cannons, size)?.run(terminal)
}

/// Send `tracing` output to a log file; the terminal belongs to the UI.
fn init_logging() -> color_eyre::Result<Option<PathBuf>> {
    let Some(dirs) = ProjectDirs::from("", "", "confetti") else {
        return Ok(None);
    };
    let dir = dirs.data_dir();
    fs::create_dir_all(dir).wrap_err_with(|| format!("creating {}", dir.display()))?;
    let path = dir.join("confetti.log");
    let file = File::create(&path).wrap_err_with(|| format!("creating {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("confetti=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(Some(path))
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    confetti: Confetti,
    /// Blast from the bottom corners when no cannons are configured.
    cannons: bool,
    /// Area the confetti was last laid out for.
    area: Rect,
    /// Completed cycles, counted by the end callback.
    cycles: Arc<AtomicUsize>,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `size`.
    pub fn new(config: Config, cannons: bool, size: Size) -> color_eyre::Result<Self> {
        let area = confetti_area(&config, Rect::new(0, 0, size.width, size.height));
        let cycles = Arc::new(AtomicUsize::new(0));
        let confetti = build_confetti(&config, cannons, area, &cycles)?;
        Ok(Self {
            running: false,
            config,
            confetti,
            cannons,
            area,
            cycles,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            self.confetti.dispatch_pending();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let display = &self.config.display;
        let [canvas, status, help] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(u16::from(display.show_status)),
            Constraint::Length(u16::from(display.show_help)),
        ])
        .areas(frame.area());

        self.confetti
            .render(&mut ConfettiLayer::new(frame.buffer_mut(), canvas));

        let accent = Color::Magenta;
        if display.show_status {
            let state = match self.confetti.controller().status() {
                AnimationStatus::Idle => "idle",
                AnimationStatus::Running => "running",
                AnimationStatus::Paused => "paused",
            };
            let status_line = Line::from(vec![
                state.bold().fg(accent),
                format!("  progress {:.2}", self.confetti.progress()).dark_gray(),
                format!("  cycles {}", self.cycles.load(Ordering::Relaxed)).dark_gray(),
                format!("  flakes {}", self.confetti.flakes().len()).dark_gray(),
                (if self.cannons { "  cannons" } else { "" }).dark_gray(),
            ])
            .centered();
            frame.render_widget(status_line, status);
        }

        if display.show_help {
            let help_line = Line::from(vec![
                "q".bold().fg(accent),
                " quit  ".dark_gray(),
                "r".bold().fg(accent),
                " restart  ".dark_gray(),
                "p".bold().fg(accent),
                " pause  ".dark_gray(),
                "s".bold().fg(accent),
                " resume  ".dark_gray(),
                "x".bold().fg(accent),
                " reset  ".dark_gray(),
                "c".bold().fg(accent),
                " toggle cannons".dark_gray(),
            ])
            .centered();
            frame.render_widget(help_line, help);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls once per frame so the animation keeps moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(frame_interval(&self.config))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                Event::Resize(width, height) => self.relayout(Size::new(width, height))?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        let controller = self.confetti.controller().clone();
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('r')) => controller.restart(),
            (_, KeyCode::Char('p')) => controller.pause(),
            (_, KeyCode::Char('s')) => controller.resume(),
            (_, KeyCode::Char('x')) => controller.reset(),
            (_, KeyCode::Char('c')) => self.toggle_cannons()?,
            _ => {}
        }
        Ok(())
    }

    /// Rebuild the confetti with or without cannons.
    fn toggle_cannons(&mut self) -> color_eyre::Result<()> {
        self.cannons = !self.cannons;
        debug!(cannons = self.cannons, "toggled cannons");
        self.confetti = build_confetti(&self.config, self.cannons, self.area, &self.cycles)?;
        Ok(())
    }

    /// Fit the confetti to a terminal of `size`. Corner cannons are placed
    /// from the area, so those need a fresh instance.
    fn relayout(&mut self, size: Size) -> color_eyre::Result<()> {
        let area = confetti_area(&self.config, Rect::new(0, 0, size.width, size.height));
        if area == self.area {
            return Ok(());
        }
        self.area = area;
        debug!(width = area.width, height = area.height, "terminal resized");

        if self.cannons && self.config.confetti.cannons_positions.is_empty() {
            self.confetti = build_confetti(&self.config, self.cannons, area, &self.cycles)?;
        } else {
            let (width, height) = viewport(area);
            self.confetti.resize(width, height);
        }
        Ok(())
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Part of the terminal left for confetti once the text lines are placed.
fn confetti_area(config: &Config, area: Rect) -> Rect {
    let reserved = u16::from(config.display.show_status) + u16::from(config.display.show_help);
    Rect {
        height: area.height.saturating_sub(reserved),
        ..area
    }
}

fn frame_interval(config: &Config) -> Duration {
    Duration::from_secs(1) / config.display.frame_rate.max(1)
}

/// Options for the confetti in `area`, with corner cannons added if asked for
/// and none are configured.
fn options_for(config: &Config, cannons: bool, area: Rect) -> ConfettiOptions {
    let mut options = config.confetti.clone();
    if !cannons {
        options.cannons_positions.clear();
    } else if options.cannons_positions.is_empty() {
        let (width, height) = viewport(area);
        options.cannons_positions = vec![Point::new(0.0, height), Point::new(width, height)];
    }
    options
}

fn build_confetti(
    config: &Config,
    cannons: bool,
    area: Rect,
    cycles: &Arc<AtomicUsize>,
) -> color_eyre::Result<Confetti> {
    let (width, height) = viewport(area);
    let cycles = Arc::clone(cycles);
    let confetti = Confetti::new(options_for(config, cannons, area), width, height)
        .wrap_err("invalid confetti options")?
        .on_animation_end(move || {
            cycles.fetch_add(1, Ordering::Relaxed);
        });
    Ok(confetti)
}
