use crate::error::{Error, Result};
use crate::movement::{Direction, Position};
use serde_json::json;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

pub fn create_replay_logger(
    filename: Option<PathBuf>,
    map_width: usize,
    map_height: usize,
) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(filename, map_width, map_height)),
    }
}

/// Records what happens during a hunt, turn by turn.
pub trait ReplayLogger {
    #[allow(unused_variables)]
    fn log_turn(&mut self, turn: usize, adventurers: Vec<AdventurerSummary>) {}

    #[allow(unused_variables)]
    fn log_event(&mut self, turn: usize, event: Event) {}

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn log_move(
        &mut self,
        turn: usize,
        adventurer: &str,
        location: Position,
        destination: Position,
        direction: Direction,
    ) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Move,
                adventurer: adventurer.to_string(),
                location,
                destination: Some(destination),
                direction: Some(direction),
                remaining: None,
            },
        );
    }

    fn log_rejected_move(
        &mut self,
        turn: usize,
        adventurer: &str,
        location: Position,
        destination: Position,
    ) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Rejected,
                adventurer: adventurer.to_string(),
                location,
                destination: Some(destination),
                direction: None,
                remaining: None,
            },
        );
    }

    fn log_collect(&mut self, turn: usize, adventurer: &str, location: Position, remaining: u32) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Collect,
                adventurer: adventurer.to_string(),
                location,
                destination: None,
                direction: None,
                remaining: Some(remaining),
            },
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum EventType {
    Move,
    Rejected,
    Collect,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Event {
    pub event_type: EventType,
    pub adventurer: String,
    pub location: Position,
    pub destination: Option<Position>,
    pub direction: Option<Direction>,
    pub remaining: Option<u32>,
}

/// The state of an adventurer at the end of a turn.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AdventurerSummary {
    pub name: String,
    pub position: Position,
    pub direction: Direction,
    pub collected: u32,
}

struct Turn {
    turn: usize,
    adventurers: Vec<AdventurerSummary>,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: PathBuf,
    map_width: usize,
    map_height: usize,
    turns: Vec<Turn>,
    events: HashMap<usize, Vec<Event>>,
}

impl JsonReplayLogger {
    fn new(filename: PathBuf, map_width: usize, map_height: usize) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            map_width,
            map_height,
            turns: Vec::new(),
            events: HashMap::new(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.filename.clone(),
            source,
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_turn(&mut self, turn: usize, adventurers: Vec<AdventurerSummary>) {
        self.turns.push(Turn { turn, adventurers });
    }

    fn log_event(&mut self, turn: usize, event: Event) {
        self.events.entry(turn).or_default().push(event);
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.filename).map_err(|e| self.io_error(e))?;
        let turns: Vec<_> = self
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "turn": turn.turn,
                    "adventurers": turn.adventurers,
                    "events": self.events.get(&turn.turn).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let data = json!({
            "map": {
                "width": self.map_width,
                "height": self.map_height,
            },
            "turns": turns,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush().map_err(|e| self.io_error(e))
    }
}
