use clap::Parser;
use clap::builder::RangedU64ValueParser;
use thiserror::Error;
use tracing::debug;

use crate::grid::Coord;
use crate::grid::Grid;
use crate::grid::GridError;

pub use crate::session::MAX_DIMENSION;
pub use crate::session::MAX_INTERVAL_MS;
pub use crate::session::MIN_DIMENSION;
pub use crate::session::MIN_INTERVAL_MS;

pub const DEFAULT_HEIGHT: usize = 32;
pub const DEFAULT_WIDTH: usize = 32;
pub const DEFAULT_INTERVAL_MS: u32 = 250;

/// Glider heading towards the bottom right, used when no seed is given
pub const GLIDER: [Coord; 5] = [(10, 12), (11, 13), (12, 11), (12, 12), (12, 13)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid seed cell \"{entry}\", expected \"row,col\"")]
    InvalidSeed { entry: String },
}

/// Cells alive at startup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seed(pub Vec<Coord>);

/// Startup options for a [`Session`](crate::session::Session).
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(name = "life", about = "Conway's Game of Life in the terminal", long_about = None)]
pub struct Config {
    /// Number of rows in the grid.
    #[arg(
        short = 'H',
        long,
        value_name = "ROWS",
        default_value_t = DEFAULT_HEIGHT,
        value_parser = dimension_parser()
    )]
    pub height: usize,

    /// Number of columns in the grid.
    #[arg(
        short = 'W',
        long,
        value_name = "COLUMNS",
        default_value_t = DEFAULT_WIDTH,
        value_parser = dimension_parser()
    )]
    pub width: usize,

    /// Milliseconds between generations while running.
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_INTERVAL_MS,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MIN_INTERVAL_MS)..=i64::from(MAX_INTERVAL_MS))
    )]
    pub interval_ms: u32,

    /// Initial live cells as "row,col;row,col;...". Defaults to a glider.
    #[arg(long, value_name = "CELLS", value_parser = parse_seed)]
    pub seed: Option<Seed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            interval_ms: DEFAULT_INTERVAL_MS,
            seed: None,
        }
    }
}

impl Config {
    /// The grid a session starts with.
    ///
    /// An explicit seed has to fit. The default glider is dropped when it doesn't.
    pub fn initial_grid(&self) -> Result<Grid, GridError> {
        match &self.seed {
            Some(Seed(seed)) => Grid::create(self.height, self.width, seed),
            None => Grid::create(self.height, self.width, &GLIDER).or_else(|_| {
                debug!(
                    height = self.height,
                    width = self.width,
                    "Glider does not fit, starting empty"
                );

                Ok(Grid::clear(self.height, self.width))
            }),
        }
    }
}

fn dimension_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(MIN_DIMENSION as u64..=MAX_DIMENSION as u64)
}

/// Parse `"row,col;row,col;..."`. Blank entries are skipped, so `""` is an empty seed.
pub fn parse_seed(s: &str) -> Result<Seed, ConfigError> {
    s.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<Coord, ConfigError> {
            let invalid = || ConfigError::InvalidSeed {
                entry: entry.to_string(),
            };

            let (row, col) = entry.split_once(',').ok_or_else(invalid)?;
            let row = row.trim().parse().map_err(|_| invalid())?;
            let col = col.trim().parse().map_err(|_| invalid())?;

            Ok((row, col))
        })
        .collect::<Result<_, _>>()
        .map(Seed)
}
