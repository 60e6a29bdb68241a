//! Reading and writing treasure maps in their text form.
//!
//! One entity per line, fields separated by ` - `:
//!
//! ```text
//! C - 3 - 4
//! M - 1 - 0
//! T - 0 - 3 - 2
//! A - Lara - 1 - 1 - S - AADADAGGA
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. An adventurer without
//! moves ends its record with a dangling ` - `.

use crate::entities::{Adventurer, Entity, PositionedEntity, Treasure};
use crate::error::{Error, ParseError, Result};
use crate::game::TreasureHunt;
use crate::movement::{Direction, MoveProgram, Position};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-(?:\s|$)").expect("field separator pattern is valid"));

/// Creates a hunt in its initial state from a map file.
pub fn read_from_file(path: impl AsRef<Path>) -> Result<TreasureHunt> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "reading treasure map");

    read_from_str(&contents)
}

/// Creates a hunt in its initial state from the text of a map.
pub fn read_from_str(contents: &str) -> Result<TreasureHunt> {
    let entities = load(contents)?;
    Ok(TreasureHunt::from_entities(entities)?)
}

/// Parses every record of a map.
pub fn load(contents: &str) -> std::result::Result<Vec<PositionedEntity>, ParseError> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| parse_record(line_number, line))
        .collect()
}

/// Parses a single record such as `T - 0 - 3 - 2`.
pub fn parse_record(
    line_number: usize,
    record: &str,
) -> std::result::Result<PositionedEntity, ParseError> {
    let fields: Vec<&str> = FIELD_SEPARATOR.split(record.trim()).map(str::trim).collect();
    let parser = RecordParser {
        line: line_number,
        record,
        fields,
    };

    let entity = match parser.fields[0] {
        "C" => parser.map_size(),
        "M" => parser.mountain(),
        "T" => parser.treasure(),
        "A" => parser.adventurer(),
        prefix => Err(ParseError::UnknownEntity {
            line: line_number,
            prefix: prefix.to_string(),
        }),
    }?;
    debug!(line = line_number, entity = entity.entity.name(), "record parsed");

    Ok(entity)
}

struct RecordParser<'a> {
    line: usize,
    record: &'a str,
    fields: Vec<&'a str>,
}

impl RecordParser<'_> {
    fn map_size(&self) -> std::result::Result<PositionedEntity, ParseError> {
        self.expect_fields("Map size", 3)?;
        let width = self.unsigned(1, "the map width")?;
        let height = self.unsigned(2, "the map height")?;

        Ok(PositionedEntity::new(
            Position::default(),
            Entity::MapSize {
                width: width as usize,
                height: height as usize,
            },
        ))
    }

    fn mountain(&self) -> std::result::Result<PositionedEntity, ParseError> {
        self.expect_fields("Mountain", 3)?;
        let x = self.int(1, "a mountain x location")?;
        let y = self.int(2, "a mountain y location")?;

        Ok(PositionedEntity::new(Position::new(x, y), Entity::Mountain))
    }

    fn treasure(&self) -> std::result::Result<PositionedEntity, ParseError> {
        self.expect_fields("Treasure", 4)?;
        let x = self.int(1, "a treasure x location")?;
        let y = self.int(2, "a treasure y location")?;
        let quantity = self.unsigned(3, "a treasure quantity")?;

        Ok(PositionedEntity::new(
            Position::new(x, y),
            Entity::Treasure(Treasure::new(quantity)),
        ))
    }

    fn adventurer(&self) -> std::result::Result<PositionedEntity, ParseError> {
        self.expect_fields("Adventurer", 6)?;
        let name = self.fields[1];
        if name.is_empty() {
            return Err(ParseError::BlankName { line: self.line });
        }
        let x = self.int(2, "an adventurer x location")?;
        let y = self.int(3, "an adventurer y location")?;

        let mut direction = self.fields[4].chars();
        let direction = match (direction.next(), direction.next()) {
            (Some(descriptor), None) => Direction::from_descriptor(descriptor),
            _ => None,
        }
        .ok_or_else(|| ParseError::InvalidDirection {
            line: self.line,
            value: self.fields[4].to_string(),
        })?;

        let moves =
            MoveProgram::from_descriptor(self.fields[5]).ok_or_else(|| ParseError::InvalidMoves {
                line: self.line,
                value: self.fields[5].to_string(),
            })?;

        Ok(PositionedEntity::new(
            Position::new(x, y),
            Entity::Adventurer(Adventurer::new(name, direction, moves)),
        ))
    }

    fn expect_fields(
        &self,
        entity: &'static str,
        expected: usize,
    ) -> std::result::Result<(), ParseError> {
        if self.fields.len() != expected {
            return Err(ParseError::WrongFieldCount {
                line: self.line,
                entity,
                expected,
                found: self.fields.len(),
                record: self.record.to_string(),
            });
        }
        Ok(())
    }

    fn int(&self, index: usize, field: &'static str) -> std::result::Result<i32, ParseError> {
        self.fields[index]
            .parse()
            .map_err(|_| ParseError::InvalidInteger {
                line: self.line,
                field,
                value: self.fields[index].to_string(),
            })
    }

    fn unsigned(&self, index: usize, field: &'static str) -> std::result::Result<u32, ParseError> {
        let value = self.int(index, field)?;
        u32::try_from(value).map_err(|_| ParseError::NegativeInteger {
            line: self.line,
            field,
            value: self.fields[index].to_string(),
        })
    }
}

/// Formats a single entity as a text record.
pub fn to_text_description(positioned: &PositionedEntity) -> String {
    let Position { x, y } = positioned.position;
    match &positioned.entity {
        // {C for map} - {width} - {height}
        Entity::MapSize { width, height } => format!("C - {width} - {height}"),
        // {M for mountain} - {x} - {y}
        Entity::Mountain => format!("M - {x} - {y}"),
        // {T for treasure} - {x} - {y} - {remaining quantity}
        Entity::Treasure(treasure) => format!("T - {x} - {y} - {}", treasure.quantity),
        // {A for adventurer} - {name} - {x} - {y} - {direction} - {collected treasures}
        Entity::Adventurer(adventurer) => format!(
            "A - {} - {x} - {y} - {} - {}",
            adventurer.name(),
            adventurer.direction().descriptor(),
            adventurer.collected()
        ),
    }
}

/// Formats entities as the text of a map, one record per line.
///
/// Records are ordered map size first, then mountains, treasures and
/// adventurers. A treasure sharing its cell with an adventurer is the one the
/// adventurer stands on and is not written.
pub fn save(entities: &[PositionedEntity]) -> String {
    let occupied: HashSet<Position> = entities
        .iter()
        .filter(|positioned| matches!(positioned.entity, Entity::Adventurer(_)))
        .map(|positioned| positioned.position)
        .collect();

    let mut records: Vec<&PositionedEntity> = entities
        .iter()
        .filter(|positioned| {
            !(matches!(positioned.entity, Entity::Treasure(_))
                && occupied.contains(&positioned.position))
        })
        .collect();
    records.sort_by_key(|positioned| export_order(&positioned.entity));

    records
        .into_iter()
        .map(|positioned| to_text_description(positioned) + "\n")
        .collect()
}

pub fn write_to_string(hunt: &TreasureHunt) -> String {
    save(&hunt.positioned_entities())
}

pub fn write_to_file(path: impl AsRef<Path>, hunt: &TreasureHunt) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_to_string(hunt)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "treasure map written");

    Ok(())
}

fn export_order(entity: &Entity) -> u8 {
    match entity {
        Entity::MapSize { .. } => 0,
        Entity::Mountain => 1,
        Entity::Treasure(_) => 2,
        Entity::Adventurer(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Instruction;

    fn parse(record: &str) -> PositionedEntity {
        parse_record(1, record).unwrap()
    }

    fn parse_error(record: &str) -> String {
        parse_record(1, record).unwrap_err().to_string()
    }

    #[test]
    fn when_parsing_basic_records_the_entities_are_created() {
        assert_eq!(
            parse("C - 1 - 1"),
            PositionedEntity::new(Position::new(0, 0), Entity::MapSize { width: 1, height: 1 })
        );
        assert_eq!(
            parse("M - 14 - 25"),
            PositionedEntity::new(Position::new(14, 25), Entity::Mountain)
        );
        assert_eq!(
            parse("T - 5 - 8 - 3"),
            PositionedEntity::new(Position::new(5, 8), Entity::Treasure(Treasure::new(3)))
        );
    }

    #[test]
    fn when_parsing_an_adventurer_all_its_fields_are_read() {
        let positioned = parse("A - Lara - 1 - 1 - S - AADADAGGA");

        assert_eq!(positioned.position, Position::new(1, 1));
        let Entity::Adventurer(adventurer) = positioned.entity else {
            panic!("expected an adventurer");
        };
        assert_eq!(adventurer.name(), "Lara");
        assert_eq!(adventurer.direction(), Direction::South);
        assert_eq!(adventurer.collected(), 0);
        assert!(adventurer.treasure().is_none());

        use Instruction::*;
        assert_eq!(
            adventurer.moves(),
            &MoveProgram::new(vec![
                Advance, Advance, TurnRight, Advance, TurnRight, Advance, TurnLeft, TurnLeft,
                Advance
            ])
        );
    }

    #[test]
    fn when_parsing_an_adventurer_without_moves_its_program_is_empty() {
        let Entity::Adventurer(adventurer) = parse("A - Indiana - 0 - 0 - O - ").entity else {
            panic!("expected an adventurer");
        };

        assert_eq!(adventurer.direction(), Direction::West);
        assert!(adventurer.moves().is_empty());
    }

    #[test]
    fn when_parsing_a_negative_coordinate_it_is_kept() {
        assert_eq!(parse("M - -1 - 2").position, Position::new(-1, 2));
    }

    #[test]
    fn when_parsing_bad_records_the_error_explains_what_is_wrong() {
        assert_eq!(parse_error("Z - 1 - 1"), "line 1: unknown entity type Z");
        assert_eq!(
            parse_error("C - 1 - 1 - 1"),
            "line 1: Map size descriptor should have 3 elements, but got 4 : C - 1 - 1 - 1"
        );
        assert_eq!(
            parse_error("C - 1 - 1a"),
            "line 1: expected an int for the map height, got 1a."
        );
        assert_eq!(
            parse_error("M - 1 - 1 - A"),
            "line 1: Mountain descriptor should have 3 elements, but got 4 : M - 1 - 1 - A"
        );
        assert_eq!(
            parse_error("T - 1 - 1"),
            "line 1: Treasure descriptor should have 4 elements, but got 3 : T - 1 - 1"
        );
        assert_eq!(
            parse_error("T - 1 - 1 - -2"),
            "line 1: expected a non-negative int for a treasure quantity, got -2."
        );
    }

    #[test]
    fn when_parsing_an_adventurer_with_a_blank_name_it_is_rejected() {
        assert_eq!(
            parse_record(2, "A -   - 1 - 1 - S - A").unwrap_err(),
            ParseError::BlankName { line: 2 }
        );
    }

    #[test]
    fn when_parsing_bad_adventurers_the_error_explains_what_is_wrong() {
        assert_eq!(
            parse_record(3, "A - Lara - 1 - 1 - W - A").unwrap_err(),
            ParseError::InvalidDirection {
                line: 3,
                value: "W".to_string()
            }
        );
        assert_eq!(
            parse_record(3, "A - Lara - 1 - 1 - NS - A").unwrap_err(),
            ParseError::InvalidDirection {
                line: 3,
                value: "NS".to_string()
            }
        );
        assert_eq!(
            parse_record(3, "A - Lara - 1 - 1 - N - AXG").unwrap_err(),
            ParseError::InvalidMoves {
                line: 3,
                value: "AXG".to_string()
            }
        );
        assert_eq!(
            parse_record(3, "A - Lara - one - 1 - N - A").unwrap_err(),
            ParseError::InvalidInteger {
                line: 3,
                field: "an adventurer x location",
                value: "one".to_string()
            }
        );
        assert!(matches!(
            parse_record(3, "A - Lara - 1 - 1 - N").unwrap_err(),
            ParseError::WrongFieldCount {
                expected: 6,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn when_loading_a_map_comments_and_blank_lines_are_skipped() {
        let contents = "\
            # {C for map} - {width} - {height}
            C - 3 - 4

            M - 1 - 0";
        let entities = load(contents).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].entity, Entity::Mountain);
    }

    #[test]
    fn when_loading_a_map_errors_cite_the_line_number() {
        let contents = "C - 3 - 4\n\nQ - 1 - 0";

        assert_eq!(
            load(contents).unwrap_err(),
            ParseError::UnknownEntity {
                line: 3,
                prefix: "Q".to_string()
            }
        );
    }

    #[test]
    fn when_reading_a_map_without_size_the_engine_refuses_it() {
        let result = read_from_str("M - 1 - 0");

        assert!(matches!(
            result,
            Err(Error::Engine(crate::error::EngineError::MapSizeCount(0)))
        ));
    }

    #[test]
    fn when_writing_basic_entities_the_records_are_formatted() {
        assert_eq!(
            to_text_description(&PositionedEntity::new(
                Position::new(0, 0),
                Entity::MapSize { width: 1, height: 1 }
            )),
            "C - 1 - 1"
        );
        assert_eq!(
            to_text_description(&PositionedEntity::new(
                Position::new(14, 25),
                Entity::Mountain
            )),
            "M - 14 - 25"
        );
        assert_eq!(
            to_text_description(&PositionedEntity::new(
                Position::new(5, 8),
                Entity::Treasure(Treasure::new(3))
            )),
            "T - 5 - 8 - 3"
        );
    }

    #[test]
    fn when_writing_a_parsed_record_the_fields_are_reproduced() {
        for record in ["C - 3 - 4", "M - 1 - 0", "T - 0 - 3 - 2"] {
            assert_eq!(to_text_description(&parse(record)), record);
        }
        assert_eq!(
            to_text_description(&parse("A - Lara - 1 - 1 - S - AADADAGGA")),
            "A - Lara - 1 - 1 - S - 0"
        );
    }

    #[test]
    fn when_saving_entities_they_are_grouped_by_kind() {
        let entities = load(
            "\
            A - Lara - 2 - 2 - N - A
            T - 1 - 1 - 1
            M - 0 - 2
            C - 3 - 3",
        )
        .unwrap();

        assert_eq!(
            save(&entities),
            "C - 3 - 3\nM - 0 - 2\nT - 1 - 1 - 1\nA - Lara - 2 - 2 - N - 0\n"
        );
    }

    #[test]
    fn when_saving_a_treasure_under_an_adventurer_it_is_not_written() {
        let entities = vec![
            parse("C - 2 - 2"),
            parse("A - Lara - 1 - 1 - N - "),
            PositionedEntity::new(Position::new(1, 1), Entity::Treasure(Treasure::new(2))),
            parse("T - 0 - 0 - 1"),
        ];

        assert_eq!(
            save(&entities),
            "C - 2 - 2\nT - 0 - 0 - 1\nA - Lara - 1 - 1 - N - 0\n"
        );
    }
}
