use std::io;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use life::config::Config;
use life::events::AppEvent;
use life::events::EngineEvent;
use life::events::Event;
use life::io::convert_event;
use life::render::Camera;
use life::render::Cursor;
use life::scheduler::Ticker;
use life::session::Session;
use life::session::SessionError;

const FRAMERATE: u32 = 60;
const FRAMETIME: Duration = Duration::from_millis((1_000 / FRAMERATE) as u64);

/// Side length of a cell in braille dots
const CELL_SCALE: usize = 2;

const KEYS: &str =
    "space start/stop  n step  c clear  t toggle  hjkl move  HJKL size  [ ] interval  q quit";

struct App {
    session: Session<Ticker>,
    camera: Camera,
    cursor: Cursor,

    /// Last rejected command, shown until the next one succeeds
    error: Option<String>,

    dirty: bool,
}

impl App {
    fn new(session: Session<Ticker>) -> Self {
        let camera = Camera::for_grid(session.grid(), CELL_SCALE);

        Self {
            session,
            camera,
            cursor: Cursor::default(),
            error: None,
            dirty: true,
        }
    }

    fn run(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        loop {
            if self.dirty {
                self.draw(out).context("Failed to draw frame")?;
                self.dirty = false;
            }

            // Block until the next event, frame or tick, whichever comes first
            let timeout = self
                .session
                .scheduler()
                .timeout(Instant::now())
                .map_or(FRAMETIME, |t| t.min(FRAMETIME));

            if event::poll(timeout).context("Failed to poll terminal events")? {
                let event = event::read().context("Failed to read terminal event")?;

                match convert_event(event) {
                    None => {}
                    Some(Event::AppEvent(AppEvent::Exit)) => break,
                    Some(event) => self.handle(event),
                }
            }

            if let Some(ticket) = self.session.scheduler_mut().poll(Instant::now()) {
                self.dirty |= self.session.tick(ticket);
            }
        }

        Ok(())
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::EngineEvent(event) => match self.apply(event) {
                Ok(()) => self.error = None,
                Err(err) => {
                    warn!(%err, ?event, "Rejected command");
                    self.error = Some(err.to_string());
                }
            },
            Event::AppEvent(AppEvent::MoveCursor { drow, dcol }) => {
                self.cursor.shift(drow, dcol, self.session.grid());
            }
            Event::AppEvent(AppEvent::Redraw | AppEvent::Exit) => {}
        }

        self.dirty = true;
    }

    fn apply(&mut self, event: EngineEvent) -> Result<(), SessionError> {
        match event {
            EngineEvent::ToggleRunning => {
                self.session.toggle_running();
            }
            EngineEvent::Step => {
                self.session.step();
            }
            EngineEvent::Clear => {
                self.session.clear();
            }
            EngineEvent::ToggleCell => {
                self.session.toggle(self.cursor.row, self.cursor.col)?;
            }
            EngineEvent::Resize { dh, dw } => {
                let state = self.session.state();
                let height = state.height().saturating_add_signed(dh);
                let width = state.width().saturating_add_signed(dw);

                let grid = self.session.resize(height, width)?.grid();
                self.cursor.clamp_to(grid);
            }
            EngineEvent::Interval { delta_ms } => {
                self.session.adjust_interval(delta_ms)?;
            }
        }

        Ok(())
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let state = self.session.state();
        let (row, col) = (self.cursor.row, self.cursor.col);

        let mut status = format!(
            "{} | gen {} | {}x{} | {}ms | ({row}, {col}) {}",
            if state.is_running() { "running" } else { "stopped" },
            state.generation(),
            state.height(),
            state.width(),
            state.interval_ms(),
            if state.grid().is_alive(row, col) { "alive" } else { "dead" },
        );

        if let Some(err) = &self.error {
            status.push_str(" | ");
            status.push_str(err);
        }

        if !self.camera.fits(state.grid()) {
            self.camera = Camera::for_grid(state.grid(), CELL_SCALE);
        }

        self.camera.reset();
        self.camera.draw_grid(state.grid());
        self.camera.draw_cursor(&self.cursor);

        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        for line in self.camera.render().lines() {
            queue!(out, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        queue!(
            out,
            style::Print(status),
            cursor::MoveToNextLine(1),
            style::Print(KEYS)
        )?;

        out.flush()
    }
}

/// Run `body` on the alternate screen. The screen is left again on every path, including when
/// entering it fails halfway.
fn on_alternate_screen<W: Write>(
    out: &mut W,
    body: impl FnOnce(&mut W) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let res = execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
        .context("Failed to enter the alternate screen")
        .and_then(|()| body(out));

    let left = execute!(out, cursor::Show, terminal::LeaveAlternateScreen)
        .context("Failed to leave the alternate screen");

    res.and(left)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();

    let session = Session::new(&config, Ticker::new()).context("Failed to set up simulation")?;

    info!(
        height = config.height,
        width = config.width,
        interval_ms = config.interval_ms,
        "Starting life"
    );

    let mut stdout = io::stdout();

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;

    let res = on_alternate_screen(&mut stdout, |out| App::new(session).run(out));

    // Restore the terminal before reporting any error from the loop
    let restored = terminal::disable_raw_mode().context("Failed to disable raw mode");

    res.and(restored)
}
