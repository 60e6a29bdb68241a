use crate::error::EngineError;
use crate::movement::{Direction, Instruction, MoveProgram, Position};
use crossterm::style::Color;
use tracing::info;
use uuid::Uuid;

/// Everything that can be described on a treasure map.
///
/// Plains are not an entity: an empty cell is simply `None` on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// The map dimensions. Never placed on the map itself.
    MapSize { width: usize, height: usize },
    Mountain,
    Treasure(Treasure),
    Adventurer(Adventurer),
}

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::MapSize { .. } => "MapSize",
            Entity::Mountain => "Mountain",
            Entity::Treasure(_) => "Treasure",
            Entity::Adventurer(_) => "Adventurer",
        }
    }

    pub fn char(&self) -> char {
        match self {
            Entity::MapSize { .. } => '?',
            Entity::Mountain => 'M',
            Entity::Treasure(treasure) => match treasure.quantity {
                0 => 'x',
                // Quantities above 9 do not fit in one cell
                quantity @ 1..=9 => char::from_digit(quantity, 10).unwrap_or('+'),
                _ => '+',
            },
            Entity::Adventurer(adventurer) => adventurer
                .name
                .chars()
                .next()
                .map_or('A', |c| c.to_ascii_uppercase()),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Entity::MapSize { .. } => Color::Reset,
            Entity::Mountain => Color::DarkGrey,
            Entity::Treasure(treasure) if treasure.quantity == 0 => Color::DarkYellow,
            Entity::Treasure(_) => Color::Yellow,
            Entity::Adventurer(adventurer) if adventurer.treasure.is_some() => Color::Green,
            Entity::Adventurer(_) => Color::Cyan,
        }
    }
}

/// A pile of treasures. Once its quantity reaches zero it stays on the map as
/// an exhausted marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Treasure {
    pub quantity: u32,
}

impl Treasure {
    pub fn new(quantity: u32) -> Treasure {
        Treasure { quantity }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adventurer {
    id: Uuid,
    name: String,
    direction: Direction,
    moves: MoveProgram,
    collected: u32,
    // The treasure of the cell the adventurer stands on, restored when it leaves
    treasure: Option<Treasure>,
}

impl Adventurer {
    pub fn new(name: impl Into<String>, direction: Direction, moves: MoveProgram) -> Adventurer {
        Adventurer {
            id: Uuid::new_v4(),
            name: name.into(),
            direction,
            moves,
            collected: 0,
            treasure: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// The number of treasures picked up so far.
    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// The treasure under the adventurer, if any.
    pub fn treasure(&self) -> Option<&Treasure> {
        self.treasure.as_ref()
    }

    pub fn moves(&self) -> &MoveProgram {
        &self.moves
    }

    pub fn has_more_moves(&self) -> bool {
        self.moves.has_next()
    }

    pub fn next_move(&mut self) -> Result<Instruction, EngineError> {
        self.moves.next_instruction(&self.name)
    }

    /// Updates the adventurer with the content of the cell it is stepping on.
    ///
    /// A treasure with a positive quantity is collected once and remembered with
    /// its decremented quantity. An exhausted treasure is remembered as is.
    /// Anything else clears the remembered treasure.
    /// Returns `true` if a treasure was collected.
    pub fn take_treasure_if_any(&mut self, destination: Option<&Entity>) -> bool {
        match destination {
            Some(Entity::Treasure(treasure)) => {
                info!(adventurer = %self.name, quantity = treasure.quantity, "stepping on a treasure");
                let collected = treasure.quantity > 0;
                let mut treasure = *treasure;
                if collected {
                    treasure.quantity -= 1;
                    self.collected += 1;
                }
                self.treasure = Some(treasure);
                collected
            }
            _ => {
                self.treasure = None;
                false
            }
        }
    }

    /// Hands back the treasure under the adventurer, leaving it with none.
    pub fn drop_treasure(&mut self) -> Option<Treasure> {
        self.treasure.take()
    }
}

/// Combines an entity with its position on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionedEntity {
    pub position: Position,
    pub entity: Entity,
}

impl PositionedEntity {
    pub fn new(position: Position, entity: Entity) -> PositionedEntity {
        PositionedEntity { position, entity }
    }
}
