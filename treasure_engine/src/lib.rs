//! # treasure_engine
//!
//! A turn based treasure hunt.
//! Adventurers follow fixed move sequences across a map of mountains and
//! treasures, collecting treasures as they walk over them.

pub mod cli;
pub mod entities;
pub mod error;
pub mod game;
pub mod movement;
pub mod text;

pub use entities::{Adventurer, Entity, PositionedEntity, Treasure};
pub use error::{EngineError, Error, ParseError};
pub use game::TreasureHunt;
pub use movement::{Direction, Instruction, MoveProgram, Position};

mod map;
mod replay;
