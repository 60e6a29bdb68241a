use crate::error::EngineError;
use serde::Serialize;
use std::fmt;

/// A position on the map. The origin is (0, 0) in the upper left corner,
/// `x` grows to the right and `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the direction an adventurer is facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Returns the direction faced after a quarter turn to the left.
    pub fn turn_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Returns the direction faced after a quarter turn to the right.
    pub fn turn_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Returns the position one cell ahead in this direction.
    /// The result is not guaranteed to lie on the map.
    pub fn forward(self, position: Position) -> Position {
        let Position { x, y } = position;
        match self {
            Direction::North => Position::new(x, y - 1),
            Direction::South => Position::new(x, y + 1),
            Direction::East => Position::new(x + 1, y),
            Direction::West => Position::new(x - 1, y),
        }
    }

    pub fn from_descriptor(value: char) -> Option<Direction> {
        match value {
            'N' => Some(Direction::North),
            'S' => Some(Direction::South),
            'E' => Some(Direction::East),
            'O' => Some(Direction::West),
            _ => None,
        }
    }

    pub fn descriptor(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'O',
        }
    }
}

/// A single step of a move program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Instruction {
    Advance,
    TurnLeft,
    TurnRight,
}

impl Instruction {
    /// Applies the instruction to a position and direction.
    ///
    /// Nothing is checked against the map here, the engine decides whether the
    /// result is a legal move.
    pub fn apply(self, position: Position, direction: Direction) -> (Position, Direction) {
        match self {
            Instruction::Advance => (direction.forward(position), direction),
            Instruction::TurnLeft => (position, direction.turn_left()),
            Instruction::TurnRight => (position, direction.turn_right()),
        }
    }

    pub fn from_descriptor(value: char) -> Option<Instruction> {
        match value {
            'A' => Some(Instruction::Advance),
            'G' => Some(Instruction::TurnLeft),
            'D' => Some(Instruction::TurnRight),
            _ => None,
        }
    }
}

/// The fixed sequence of instructions of an adventurer.
///
/// It is consumed front to back exactly once: instructions are never appended
/// and the cursor never moves backward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveProgram {
    instructions: Vec<Instruction>,
    cursor: usize,
}

impl MoveProgram {
    pub fn new(instructions: Vec<Instruction>) -> MoveProgram {
        MoveProgram {
            instructions,
            cursor: 0,
        }
    }

    /// Builds a program from a sequence such as `AADADAGGA`.
    /// Returns `None` if any character is not a known instruction.
    pub fn from_descriptor(moves: &str) -> Option<MoveProgram> {
        moves
            .chars()
            .map(Instruction::from_descriptor)
            .collect::<Option<Vec<_>>>()
            .map(MoveProgram::new)
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.instructions.len()
    }

    /// Pops the next instruction. `has_next` must be checked first.
    pub fn next_instruction(&mut self, owner: &str) -> Result<Instruction, EngineError> {
        let instruction = self
            .instructions
            .get(self.cursor)
            .copied()
            .ok_or_else(|| EngineError::ProgramExhausted {
                name: owner.to_string(),
            })?;
        self.cursor += 1;
        Ok(instruction)
    }

    pub fn remaining(&self) -> usize {
        self.instructions.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromIterator<Instruction> for MoveProgram {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        MoveProgram::new(iter.into_iter().collect())
    }
}
