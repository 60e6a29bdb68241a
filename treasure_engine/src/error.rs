use crate::movement::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the text description of a map.
///
/// Every variant carries the 1-based line number of the offending record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unknown entity type {prefix}")]
    UnknownEntity { line: usize, prefix: String },

    #[error("line {line}: {entity} descriptor should have {expected} elements, but got {found} : {record}")]
    WrongFieldCount {
        line: usize,
        entity: &'static str,
        expected: usize,
        found: usize,
        record: String,
    },

    #[error("line {line}: expected an int for {field}, got {value}.")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: expected a non-negative int for {field}, got {value}.")]
    NegativeInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: expected a valid direction descriptor, got {value}.")]
    InvalidDirection { line: usize, value: String },

    #[error("line {line}: expected a valid move sequence, got {value}.")]
    InvalidMoves { line: usize, value: String },

    #[error("line {line}: expected the adventurer to have a non-empty name.")]
    BlankName { line: usize },
}

/// Errors raised by the simulation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("expected 1 map size descriptor, but got {0}")]
    MapSizeCount(usize),

    #[error("{entity} at {position} lies outside of the {width}x{height} map")]
    OutOfBounds {
        entity: &'static str,
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("adventurer {name} has no more moves to run")]
    ProgramExhausted { name: String },

    #[error("no adventurer found at registered position {0}")]
    MissingAdventurer(Position),
}

/// Top level error of the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize replay: {0}")]
    Replay(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
