use crate::entities::Entity;
use crate::movement::Position;
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, stdout, Write};

/// The cells of the treasure map, each holding at most one entity.
///
/// Cells are stored column by column so that walking the grid visits
/// positions by increasing `x`, then increasing `y`.
pub struct Map {
    width: usize,
    height: usize,
    grid: Vec<Option<Entity>>,
}

impl Map {
    pub fn new(width: usize, height: usize) -> Map {
        let mut grid = Vec::with_capacity(width * height);
        // Initialize the grid with plains
        grid.resize_with(width * height, || None);

        Map {
            width,
            height,
            grid,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Returns the occupant of a cell, `None` for plains and out of bounds positions.
    pub fn get(&self, position: Position) -> Option<&Entity> {
        self.index(position)
            .and_then(|index| self.grid[index].as_ref())
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Entity> {
        self.index(position)
            .and_then(|index| self.grid[index].as_mut())
    }

    /// Places an entity on a cell, or clears it with `None`.
    /// Out of bounds positions are ignored.
    pub fn set(&mut self, position: Position, value: Option<Entity>) {
        if let Some(index) = self.index(position) {
            self.grid[index] = value;
        }
    }

    /// Removes and returns the occupant of a cell.
    pub fn take(&mut self, position: Position) -> Option<Entity> {
        self.index(position)
            .and_then(|index| self.grid[index].take())
    }

    /// All occupied cells, by increasing `x` then increasing `y`.
    pub fn entities(&self) -> impl Iterator<Item = (Position, &Entity)> + '_ {
        self.grid.iter().enumerate().filter_map(|(index, entity)| {
            entity
                .as_ref()
                .map(|entity| (self.position(index), entity))
        })
    }

    pub fn draw(&self, turn: usize) -> io::Result<()> {
        let mut stdout = stdout();

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Turn: "),
            Print(turn.to_string()),
            Print("\n\n")
        )?;

        for y in 0..self.height {
            for x in 0..self.width {
                let entity = self.grid[x * self.height + y].as_ref();
                execute!(
                    stdout,
                    SetForegroundColor(entity.map_or(Color::Reset, |entity| entity.color())),
                    Print(entity.map_or('.', |entity| entity.char())),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;

        if x >= self.width || y >= self.height {
            return None;
        }

        Some(x * self.height + y)
    }

    fn position(&self, index: usize) -> Position {
        // Indices never exceed width * height, which was allocated from i32 coordinates
        Position::new((index / self.height) as i32, (index % self.height) as i32)
    }
}
