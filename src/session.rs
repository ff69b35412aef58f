use std::mem;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use tracing::trace;

use crate::config::Config;
use crate::engine;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::scheduler::Scheduler;
use crate::scheduler::Ticket;

pub const MIN_DIMENSION: usize = 1;
pub const MAX_DIMENSION: usize = 100;

pub const MIN_INTERVAL_MS: u32 = 1;
pub const MAX_INTERVAL_MS: u32 = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(
        "Step interval of {ms}ms is outside of [{min}, {max}]",
        min = MIN_INTERVAL_MS,
        max = MAX_INTERVAL_MS
    )]
    InvalidInterval { ms: i64 },

    #[error(
        "Grid size {height}x{width} is outside of [{min}, {max}]",
        min = MIN_DIMENSION,
        max = MAX_DIMENSION
    )]
    InvalidDimension { height: usize, width: usize },
}

pub(crate) fn check_interval(ms: u32) -> Result<(), SessionError> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&ms) {
        return Err(SessionError::InvalidInterval { ms: ms.into() });
    }

    Ok(())
}

pub(crate) fn check_dimensions(height: usize, width: usize) -> Result<(), SessionError> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;

    if !range.contains(&height) || !range.contains(&width) {
        return Err(SessionError::InvalidDimension { height, width });
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Everything a front-end needs to render the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationState {
    grid: Grid,
    run_state: RunState,
    interval_ms: u32,

    /// Steps applied since the grid was last created, cleared or resized
    generation: u64,
}

impl SimulationState {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.into())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A running simulation: the state, the run/stop state machine and the scheduler that keeps it
/// ticking.
///
/// All grid reads and writes go through `&mut self`, so one step, toggle or resize always
/// completes before the next begins. A session that has to be shared between threads belongs
/// behind a single `Mutex`.
pub struct Session<S> {
    state: SimulationState,

    /// Second buffer for the double-buffered step
    scratch: Grid,

    scheduler: S,

    /// The only ticket [`Session::tick`] will act on
    ticket: Ticket,
}

impl<S: Scheduler> Session<S> {
    /// Build a stopped session from a validated `config`.
    pub fn new(config: &Config, scheduler: S) -> Result<Self, SessionError> {
        check_dimensions(config.height, config.width)?;

        let grid = config.initial_grid()?;

        Self::with_grid(grid, config.interval_ms, scheduler)
    }

    /// Build a stopped session around an existing grid.
    pub fn with_grid(grid: Grid, interval_ms: u32, scheduler: S) -> Result<Self, SessionError> {
        check_dimensions(grid.height(), grid.width())?;
        check_interval(interval_ms)?;

        let scratch = Grid::clear(grid.height(), grid.width());

        Ok(Self {
            state: SimulationState {
                grid,
                run_state: RunState::Stopped,
                interval_ms,
                generation: 0,
            },
            scratch,
            scheduler,
            ticket: Ticket::first(),
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Flip the cell at `(row, col)`.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<&SimulationState, SessionError> {
        self.state.grid.toggle_in_place(row, col)?;

        Ok(&self.state)
    }

    /// Advance by exactly one generation. The run state is left alone.
    pub fn step(&mut self) -> &SimulationState {
        engine::step_into(&self.state.grid, &mut self.scratch);
        mem::swap(&mut self.state.grid, &mut self.scratch);
        self.state.generation += 1;

        &self.state
    }

    pub fn start(&mut self) -> &SimulationState {
        if !self.state.is_running() {
            debug!(interval_ms = self.state.interval_ms, "Starting simulation");

            self.state.run_state = RunState::Running;
            self.rearm();
        }

        &self.state
    }

    pub fn stop(&mut self) -> &SimulationState {
        if self.state.is_running() {
            debug!(generation = self.state.generation, "Stopping simulation");

            self.state.run_state = RunState::Stopped;
            self.rearm();
        }

        &self.state
    }

    /// Start when stopped, stop when running.
    pub fn toggle_running(&mut self) -> &SimulationState {
        match self.state.run_state {
            RunState::Stopped => self.start(),
            RunState::Running => self.stop(),
        }
    }

    /// Change the step interval. While running, the new interval applies from the next tick on.
    pub fn set_interval(&mut self, ms: u32) -> Result<&SimulationState, SessionError> {
        check_interval(ms)?;

        debug!(interval_ms = ms, "Changing step interval");

        self.state.interval_ms = ms;
        self.rearm();

        Ok(&self.state)
    }

    /// Move the step interval by `delta_ms`. A result outside of the interval bounds is rejected
    /// with the value that was asked for, negative or not.
    pub fn adjust_interval(&mut self, delta_ms: i64) -> Result<&SimulationState, SessionError> {
        let ms = i64::from(self.state.interval_ms).saturating_add(delta_ms);

        let ms = u32::try_from(ms)
            .ok()
            .filter(|ms| (MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(ms))
            .ok_or(SessionError::InvalidInterval { ms })?;

        self.set_interval(ms)
    }

    /// Replace the grid with an all dead `height x width` one.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<&SimulationState, SessionError> {
        check_dimensions(height, width)?;

        debug!(height, width, "Resizing grid");

        self.state.grid = Grid::resize(height, width);
        self.scratch = Grid::clear(height, width);
        self.state.generation = 0;
        self.rearm();

        Ok(&self.state)
    }

    /// Kill every cell, keeping the current dimensions.
    pub fn clear(&mut self) -> &SimulationState {
        let (height, width) = self.state.grid.dimensions();

        debug!(height, width, "Clearing grid");

        self.state.grid = Grid::clear(height, width);
        self.state.generation = 0;
        self.rearm();

        &self.state
    }

    /// Called by the scheduler. Steps and returns `true` only while running and only for the
    /// most recently issued ticket.
    pub fn tick(&mut self, ticket: Ticket) -> bool {
        if !self.state.is_running() || ticket != self.ticket {
            trace!(?ticket, current = ?self.ticket, "Dropping stale tick");
            return false;
        }

        self.step();

        true
    }

    // Invalidates every outstanding tick. While running, scheduling restarts under a new ticket.
    fn rearm(&mut self) {
        self.ticket = self.ticket.next();

        match self.state.run_state {
            RunState::Running => self.scheduler.schedule(self.ticket, self.state.interval()),
            RunState::Stopped => self.scheduler.cancel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RunState;
    use super::Session;
    use super::SessionError;
    use crate::grid::Grid;
    use crate::grid::GridError;
    use crate::scheduler::Scheduler;
    use crate::scheduler::Ticket;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Schedule(Ticket, Duration),
        Cancel,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn last_ticket(&self) -> Option<Ticket> {
            self.calls.iter().rev().find_map(|call| match call {
                Call::Schedule(ticket, _) => Some(*ticket),
                Call::Cancel => None,
            })
        }
    }

    impl Scheduler for Recorder {
        fn schedule(&mut self, ticket: Ticket, interval: Duration) {
            self.calls.push(Call::Schedule(ticket, interval));
        }

        fn cancel(&mut self) {
            self.calls.push(Call::Cancel);
        }
    }

    fn blinker() -> Session<Recorder> {
        let grid = Grid::create(5, 5, &[(2, 1), (2, 2), (2, 3)]).unwrap();

        Session::with_grid(grid, 250, Recorder::default()).unwrap()
    }

    #[test]
    fn starts_stopped() {
        let session = blinker();

        assert_eq!(session.state().run_state(), RunState::Stopped);
        assert_eq!(session.state().generation(), 0);
        assert!(session.scheduler().calls.is_empty());
    }

    #[test]
    fn start_schedules_and_stop_cancels() {
        let mut session = blinker();

        assert!(session.start().is_running());
        assert_eq!(
            session.scheduler().calls,
            [Call::Schedule(session.ticket, Duration::from_millis(250))]
        );

        assert!(!session.stop().is_running());
        assert_eq!(session.scheduler().calls.last(), Some(&Call::Cancel));
    }

    #[test]
    fn repeated_start_and_stop_are_noops() {
        let mut session = blinker();

        session.stop();
        session.start();
        session.start();

        assert_eq!(session.scheduler().calls.len(), 1);
    }

    #[test]
    fn toggle_running_flips() {
        let mut session = blinker();

        assert!(session.toggle_running().is_running());
        assert!(!session.toggle_running().is_running());
    }

    #[test]
    fn tick_steps_only_while_running() {
        let mut session = blinker();
        let ticket = session.ticket;

        assert!(!session.tick(ticket));
        assert_eq!(session.state().generation(), 0);

        session.start();
        let ticket = session.scheduler().last_ticket().unwrap();

        assert!(session.tick(ticket));
        assert!(session.tick(ticket));
        assert_eq!(session.state().generation(), 2);
    }

    #[test]
    fn tick_after_stop_is_dropped() {
        let mut session = blinker();
        session.start();
        let ticket = session.scheduler().last_ticket().unwrap();

        session.stop();

        assert!(!session.tick(ticket));
        assert_eq!(session.state().generation(), 0);
    }

    #[test]
    fn resize_invalidates_armed_tick() {
        let mut session = blinker();
        session.start();
        let stale = session.scheduler().last_ticket().unwrap();

        session.resize(8, 3).unwrap();
        let fresh = session.scheduler().last_ticket().unwrap();

        assert_ne!(stale, fresh);
        assert!(!session.tick(stale));
        assert!(session.state().is_running());
        assert!(session.tick(fresh));
        assert_eq!(session.grid(), &Grid::clear(8, 3));
    }

    #[test]
    fn clear_invalidates_armed_tick() {
        let mut session = blinker();
        session.start();
        let stale = session.scheduler().last_ticket().unwrap();

        session.clear();

        assert!(!session.tick(stale));
        assert_eq!(session.grid(), &Grid::clear(5, 5));
        assert_eq!(session.state().generation(), 0);
    }

    #[test]
    fn interval_change_reschedules_while_running() {
        let mut session = blinker();
        session.start();

        session.set_interval(40).unwrap();

        assert_eq!(
            session.scheduler().calls.last(),
            Some(&Call::Schedule(session.ticket, Duration::from_millis(40)))
        );
        assert_eq!(session.state().interval_ms(), 40);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let mut session = blinker();

        assert_eq!(
            session.set_interval(0),
            Err(SessionError::InvalidInterval { ms: 0 })
        );
        assert_eq!(
            session.set_interval(1001),
            Err(SessionError::InvalidInterval { ms: 1001 })
        );
        assert_eq!(session.state().interval_ms(), 250);

        assert_eq!(session.set_interval(1).unwrap().interval_ms(), 1);
        assert_eq!(session.set_interval(1000).unwrap().interval_ms(), 1000);
    }

    #[test]
    fn adjust_interval_reports_requested_value() {
        let mut session = blinker();
        session.set_interval(10).unwrap();

        assert_eq!(
            session.adjust_interval(-60),
            Err(SessionError::InvalidInterval { ms: -50 })
        );
        assert_eq!(
            session.adjust_interval(-10),
            Err(SessionError::InvalidInterval { ms: 0 })
        );
        assert_eq!(
            session.adjust_interval(i64::MIN).unwrap_err().to_string(),
            format!("Step interval of {}ms is outside of [1, 1000]", i64::MIN + 10)
        );
        assert_eq!(session.state().interval_ms(), 10);

        assert_eq!(session.adjust_interval(-9).unwrap().interval_ms(), 1);
        assert_eq!(session.adjust_interval(999).unwrap().interval_ms(), 1000);
        assert_eq!(
            session.adjust_interval(1),
            Err(SessionError::InvalidInterval { ms: 1001 })
        );
    }

    #[test]
    fn step_once_keeps_run_state() {
        let mut session = blinker();

        let state = session.step();

        assert!(!state.is_running());
        assert_eq!(
            state.grid(),
            &Grid::create(5, 5, &[(1, 2), (2, 2), (3, 2)]).unwrap()
        );
        assert!(session.scheduler().calls.is_empty());
    }

    #[test]
    fn toggle_reports_out_of_bounds() {
        let mut session = blinker();

        assert_eq!(
            session.toggle(5, 0),
            Err(SessionError::Grid(GridError::OutOfBounds {
                row: 5,
                col: 0,
                height: 5,
                width: 5
            }))
        );

        assert!(session.toggle(0, 4).unwrap().grid().is_alive(0, 4));
    }

    #[test]
    fn resize_rejects_bad_dimensions() {
        let mut session = blinker();

        assert_eq!(
            session.resize(0, 10),
            Err(SessionError::InvalidDimension {
                height: 0,
                width: 10
            })
        );
        assert!(session.resize(10, 101).is_err());
        assert_eq!(session.grid().dimensions(), (5, 5));
    }

    #[test]
    fn clear_keeps_dimensions_in_order() {
        let grid = Grid::create(3, 7, &[(2, 6)]).unwrap();
        let mut session = Session::with_grid(grid, 100, Recorder::default()).unwrap();

        assert_eq!(session.clear().grid(), &Grid::clear(3, 7));
    }
}
