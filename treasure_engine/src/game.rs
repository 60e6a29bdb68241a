use crate::entities::{Adventurer, Entity, PositionedEntity};
use crate::error::EngineError;
use crate::map::Map;
use crate::movement::{Direction, Position};
use crate::replay::{create_replay_logger, AdventurerSummary, ReplayLogger};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The treasure hunt.
/// Main entry point for running the simulation.
///
/// A hunt is built from the entities of a map with [`TreasureHunt::from_entities`],
/// played with [`TreasureHunt::full_run`] (or turn by turn with
/// [`TreasureHunt::run_next_turn`]) and exported with
/// [`TreasureHunt::positioned_entities`].
///
/// Adventurers live on the map. The registry only keeps their positions, in
/// the order they were described, and is updated together with the map.
pub struct TreasureHunt {
    map: Map,
    adventurers: Vec<Position>,
    turn: usize,
    replay_logger: Box<dyn ReplayLogger>,
}

impl TreasureHunt {
    /// Creates a hunt from the entities describing a map.
    ///
    /// Exactly one [`Entity::MapSize`] is expected. Every other entity is placed at
    /// its position, a later entity replacing an earlier one on the same cell.
    pub fn from_entities(
        positioned_entities: Vec<PositionedEntity>,
    ) -> Result<TreasureHunt, EngineError> {
        let sizes: Vec<(usize, usize)> = positioned_entities
            .iter()
            .filter_map(|positioned| match positioned.entity {
                Entity::MapSize { width, height } => Some((width, height)),
                _ => None,
            })
            .collect();

        let &[(width, height)] = sizes.as_slice() else {
            return Err(EngineError::MapSizeCount(sizes.len()));
        };

        let mut map = Map::new(width, height);
        let mut candidates: Vec<(Position, Uuid)> = Vec::new();

        for PositionedEntity { position, entity } in positioned_entities {
            if let Entity::MapSize { .. } = entity {
                continue;
            }

            if !map.in_bounds(position) {
                return Err(EngineError::OutOfBounds {
                    entity: entity.name(),
                    position,
                    width,
                    height,
                });
            }

            if let Entity::Adventurer(adventurer) = &entity {
                candidates.push((position, adventurer.id()));
            }
            map.set(position, Some(entity));
        }

        // Only adventurers still standing where they were placed take part in the hunt
        let adventurers = candidates
            .into_iter()
            .filter(|(position, id)| match map.get(*position) {
                Some(Entity::Adventurer(adventurer)) if adventurer.id() == *id => true,
                _ => {
                    warn!(%position, "adventurer was overwritten by a later entity and is ignored");
                    false
                }
            })
            .map(|(position, _)| position)
            .collect::<Vec<_>>();

        info!(
            width,
            height,
            adventurers = adventurers.len(),
            "treasure map loaded"
        );

        Ok(TreasureHunt {
            map,
            adventurers,
            turn: 0,
            replay_logger: create_replay_logger(None, width, height),
        })
    }

    /// Records every turn of the hunt into a JSON replay file, written by [`TreasureHunt::save_replay`].
    pub fn with_replay_logger(mut self, replay_filename: Option<PathBuf>) -> TreasureHunt {
        self.replay_logger =
            create_replay_logger(replay_filename, self.map.width(), self.map.height());
        self
    }

    pub fn save_replay(&self) -> crate::error::Result<()> {
        self.replay_logger.save()
    }

    /// The number of turns run so far.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Returns whether at least one adventurer has a move left to run.
    pub fn has_more_turns_to_run(&self) -> bool {
        self.adventurers
            .iter()
            .filter_map(|position| self.adventurer_at(*position))
            .any(Adventurer::has_more_moves)
    }

    /// Runs the next move of every adventurer, in registry order.
    ///
    /// A move onto a mountain, onto another adventurer or off the map is
    /// rejected: the adventurer stays as it is but the move is consumed.
    /// Adventurers are not re-checked once others have moved, so a blocked
    /// adventurer stays blocked for the whole turn.
    pub fn run_next_turn(&mut self) -> Result<(), EngineError> {
        self.turn += 1;
        debug!(turn = self.turn, "running turn");

        for index in 0..self.adventurers.len() {
            let position = self.adventurers[index];
            let (instruction, direction, id, name) = {
                let Some(Entity::Adventurer(adventurer)) = self.map.get_mut(position) else {
                    return Err(EngineError::MissingAdventurer(position));
                };

                if !adventurer.has_more_moves() {
                    continue;
                }

                (
                    adventurer.next_move()?,
                    adventurer.direction(),
                    adventurer.id(),
                    adventurer.name().to_string(),
                )
            };
            let (destination, new_direction) = instruction.apply(position, direction);

            info!(
                adventurer = %name,
                from = %position,
                ?direction,
                to = %destination,
                direction_after = ?new_direction,
                "moving"
            );

            if !self.is_valid_move(id, destination) {
                warn!(adventurer = %name, from = %position, to = %destination, "invalid move");
                self.replay_logger
                    .log_rejected_move(self.turn, &name, position, destination);
                continue;
            }

            if destination == position {
                if let Some(Entity::Adventurer(adventurer)) = self.map.get_mut(position) {
                    adventurer.set_direction(new_direction);
                }
            } else {
                self.move_adventurer(index, destination, new_direction)?;
            }

            self.replay_logger
                .log_move(self.turn, &name, position, destination, new_direction);
        }

        let summaries = self.summaries();
        self.replay_logger.log_turn(self.turn, summaries);

        Ok(())
    }

    /// Runs all moves of all adventurers.
    pub fn full_run(&mut self) -> Result<(), EngineError> {
        while self.has_more_turns_to_run() {
            self.run_next_turn()?;
        }
        info!(turns = self.turn, "hunt finished");

        Ok(())
    }

    /// Exports the state of the map.
    ///
    /// The map size comes first at (0, 0), followed by every occupied cell by
    /// increasing `x` then `y`, followed by one treasure per adventurer standing
    /// on a treasure.
    pub fn positioned_entities(&self) -> Vec<PositionedEntity> {
        info!("exporting entities");
        let size = PositionedEntity::new(
            Position::default(),
            Entity::MapSize {
                width: self.map.width(),
                height: self.map.height(),
            },
        );

        let occupants = self
            .map
            .entities()
            .map(|(position, entity)| PositionedEntity::new(position, entity.clone()));

        let shadows = self
            .map
            .entities()
            .filter_map(|(position, entity)| match entity {
                Entity::Adventurer(adventurer) => adventurer
                    .treasure()
                    .map(|treasure| PositionedEntity::new(position, Entity::Treasure(*treasure))),
                _ => None,
            });

        let export: Vec<PositionedEntity> = std::iter::once(size)
            .chain(occupants)
            .chain(shadows)
            .collect();
        info!(entities = export.len(), "entities exported");

        export
    }

    /// The adventurers taking part in the hunt with their position, in registry order.
    pub fn adventurers(&self) -> Vec<(Position, &Adventurer)> {
        self.adventurers
            .iter()
            .filter_map(|position| {
                self.adventurer_at(*position)
                    .map(|adventurer| (*position, adventurer))
            })
            .collect()
    }

    /// Draws the map to the console.
    pub fn draw(&self) -> io::Result<()> {
        self.map.draw(self.turn)
    }

    fn adventurer_at(&self, position: Position) -> Option<&Adventurer> {
        match self.map.get(position) {
            Some(Entity::Adventurer(adventurer)) => Some(adventurer),
            _ => None,
        }
    }

    fn is_valid_move(&self, id: Uuid, destination: Position) -> bool {
        if !self.map.in_bounds(destination) {
            return false;
        }

        match self.map.get(destination) {
            None | Some(Entity::Treasure(_)) => true,
            // Turning in place keeps the adventurer on its own cell
            Some(Entity::Adventurer(other)) => other.id() == id,
            Some(Entity::Mountain) | Some(Entity::MapSize { .. }) => false,
        }
    }

    fn move_adventurer(
        &mut self,
        index: usize,
        destination: Position,
        direction: Direction,
    ) -> Result<(), EngineError> {
        let from = self.adventurers[index];
        let Some(Entity::Adventurer(mut adventurer)) = self.map.take(from) else {
            return Err(EngineError::MissingAdventurer(from));
        };
        adventurer.set_direction(direction);

        // If the adventurer was on a treasure, put the treasure back
        let left_behind = adventurer.drop_treasure().map(Entity::Treasure);
        self.map.set(from, left_behind);

        let target = self.map.take(destination);
        if adventurer.take_treasure_if_any(target.as_ref()) {
            let remaining = adventurer.treasure().map_or(0, |treasure| treasure.quantity);
            info!(
                adventurer = adventurer.name(),
                at = %destination,
                collected = adventurer.collected(),
                remaining,
                "treasure collected"
            );
            self.replay_logger
                .log_collect(self.turn, adventurer.name(), destination, remaining);
        }

        self.map.set(destination, Some(Entity::Adventurer(adventurer)));
        self.adventurers[index] = destination;

        Ok(())
    }

    fn summaries(&self) -> Vec<AdventurerSummary> {
        self.adventurers()
            .into_iter()
            .map(|(position, adventurer)| AdventurerSummary {
                name: adventurer.name().to_string(),
                position,
                direction: adventurer.direction(),
                collected: adventurer.collected(),
            })
            .collect()
    }
}
