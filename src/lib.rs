pub mod config;
pub mod engine;
pub mod events;
pub mod grid;
pub mod io;
pub mod render;
pub mod rules;
pub mod scheduler;
pub mod session;
