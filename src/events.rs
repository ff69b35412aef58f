#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    EngineEvent(EngineEvent),
    AppEvent(AppEvent),
}

/// Requests that go through the [`Session`](crate::session::Session)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// Start when stopped, stop when running
    ToggleRunning,

    /// Advance by one generation
    Step,

    Clear,

    /// Flip the cell under the cursor
    ToggleCell,

    /// Grow or shrink the grid by `dh` rows and `dw` columns
    Resize { dh: isize, dw: isize },

    /// Lengthen or shorten the step interval
    Interval { delta_ms: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEvent {
    MoveCursor { drow: isize, dcol: isize },

    /// The terminal changed size
    Redraw,

    /// Exit the application
    Exit,
}
