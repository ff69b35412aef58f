use std::time::Duration;
use std::time::Instant;

/// Identifies one arming of a [`Scheduler`].
///
/// A [`Session`](crate::session::Session) hands out a new ticket every time its run state,
/// interval or grid dimensions change, and only steps on ticks carrying the latest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) const fn first() -> Self {
        Self(0)
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Drives periodic steps of a session.
///
/// Implementors deliver `ticket` back to [`Session::tick`](crate::session::Session::tick) every
/// `interval` until told otherwise. A call to `schedule` replaces whatever was armed before.
pub trait Scheduler {
    fn schedule(&mut self, ticket: Ticket, interval: Duration);

    /// Stop delivering ticks. Nothing armed before the call may fire afterwards.
    fn cancel(&mut self);
}

struct Armed {
    ticket: Ticket,
    interval: Duration,
    deadline: Instant,
}

/// A deadline based [`Scheduler`] for event loops that poll.
///
/// The loop asks [`Ticker::timeout`] how long it may block, then calls [`Ticker::poll`] to
/// collect a due ticket.
#[derive(Default)]
pub struct Ticker {
    armed: Option<Armed>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the ticker relative to `now`. The first tick is due one `interval` later.
    pub fn schedule_at(&mut self, ticket: Ticket, interval: Duration, now: Instant) {
        self.armed = Some(Armed {
            ticket,
            interval,
            deadline: now + interval,
        });
    }

    /// Time left until the next tick is due, if any tick is armed.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.armed
            .as_ref()
            .map(|armed| armed.deadline.saturating_duration_since(now))
    }

    /// Returns the armed ticket if its deadline has passed, and moves the deadline forward.
    ///
    /// Missed deadlines are skipped instead of replayed, so a stalled loop steps once rather
    /// than in a burst.
    pub fn poll(&mut self, now: Instant) -> Option<Ticket> {
        let armed = self.armed.as_mut()?;

        if now < armed.deadline {
            return None;
        }

        armed.deadline += armed.interval;
        if armed.deadline <= now {
            armed.deadline = now + armed.interval;
        }

        Some(armed.ticket)
    }
}

impl Scheduler for Ticker {
    fn schedule(&mut self, ticket: Ticket, interval: Duration) {
        self.schedule_at(ticket, interval, Instant::now());
    }

    fn cancel(&mut self) {
        self.armed = None;
    }
}
