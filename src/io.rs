use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::AppEvent;
use crate::events::EngineEvent;
use crate::events::Event;

/// How much one key press changes the step interval
pub const INTERVAL_STEP_MS: i64 = 10;

/// Converts a crossterm event into a life event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CrossTermEvent::Key(key_event) => convert_key(key_event),
        CrossTermEvent::Resize(..) => Some(Event::AppEvent(AppEvent::Redraw)),
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    let engine = |e| Some(Event::EngineEvent(e));
    let cursor = |drow, dcol| Some(Event::AppEvent(AppEvent::MoveCursor { drow, dcol }));

    match key_event {
        KeyEvent {
            code: KeyCode::Char('q'),
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Event::AppEvent(AppEvent::Exit)),

        KeyEvent { code, .. } => match code {
            KeyCode::Char(' ') => engine(EngineEvent::ToggleRunning),
            KeyCode::Char('n') => engine(EngineEvent::Step),
            KeyCode::Char('c') => engine(EngineEvent::Clear),
            KeyCode::Char('t') | KeyCode::Enter => engine(EngineEvent::ToggleCell),

            // grid size
            KeyCode::Char('J') => engine(EngineEvent::Resize { dh: 1, dw: 0 }),
            KeyCode::Char('K') => engine(EngineEvent::Resize { dh: -1, dw: 0 }),
            KeyCode::Char('L') => engine(EngineEvent::Resize { dh: 0, dw: 1 }),
            KeyCode::Char('H') => engine(EngineEvent::Resize { dh: 0, dw: -1 }),

            // step interval
            KeyCode::Char(']') => engine(EngineEvent::Interval {
                delta_ms: INTERVAL_STEP_MS,
            }),
            KeyCode::Char('[') => engine(EngineEvent::Interval {
                delta_ms: -INTERVAL_STEP_MS,
            }),

            // movements
            KeyCode::Char('h') | KeyCode::Left => cursor(0, -1),
            KeyCode::Char('j') | KeyCode::Down => cursor(1, 0),
            KeyCode::Char('k') | KeyCode::Up => cursor(-1, 0),
            KeyCode::Char('l') | KeyCode::Right => cursor(0, 1),

            _ => None,
        },
    }
}
