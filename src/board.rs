// Board snapshots: the connectivity facts a game hands us each turn, before
// they are turned into a graph.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directions::Direction;
use crate::graph::check_size;
use crate::grid::{Dimensions, NodeId, Pos};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board has no cells ({width}x{height})")]
    Empty { width: usize, height: usize },
    #[error("Expected {expected} cells for the board, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error("Invalid tile {tile:?}, expected 4 characters of '0'/'1'")]
    InvalidTile { tile: String },
    #[error("Cell {cell} has neighbor {neighbor}, but the board only has {len} cells")]
    NeighborOutOfRange { cell: NodeId, neighbor: i64, len: usize },
    #[error("Board is too large ({width}x{height})")]
    TooLarge { width: usize, height: usize },
    #[error("Cannot shift line {line}, the board only has {lines} of them")]
    LineOutOfRange { line: usize, lines: usize },
}

/// Open sides of a tile, one bit per `Direction::index()`.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default)]
pub struct Sides(u8);

impl Sides {
    pub const CLOSED: Sides = Sides(0);
    pub const OPEN: Sides = Sides(0b1111);

    /// Parses the usual "up right down left" string encoding, e.g. "0110" is a
    /// tile open to the right and down.
    pub fn parse(tile: &str) -> Result<Sides, BoardError> {
        let invalid = || BoardError::InvalidTile { tile: tile.to_string() };
        if tile.len() != Direction::ALL.len() {
            return Err(invalid());
        }
        let mut sides = Sides::CLOSED;
        for (c, direction) in tile.chars().zip(Direction::ALL) {
            match c {
                '1' => sides = sides.with(direction),
                '0' => {},
                _ => return Err(invalid()),
            }
        }
        Ok(sides)
    }

    #[inline]
    pub fn is_open(&self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub fn with(self, direction: Direction) -> Sides {
        Sides(self.0 | (1 << direction.index()))
    }
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for direction in Direction::ALL {
            f.write_str(if self.is_open(direction) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Rectangular board where each cell says which of its sides are open. Two
/// cells are connected when both facing sides are open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorBoard {
    pub dimensions: Dimensions,
    // tiles[y * width + x]
    tiles: Vec<Sides>,
}

impl DoorBoard {
    pub fn new(dimensions: Dimensions, tiles: Vec<Sides>) -> Result<Self, BoardError> {
        check_dimensions(&dimensions, tiles.len())?;
        Ok(DoorBoard { dimensions, tiles })
    }

    pub fn parse(dimensions: Dimensions, tiles: &[String]) -> Result<Self, BoardError> {
        let tiles = tiles.iter().map(|t| Sides::parse(t))
            .collect::<Result<Vec<_>, _>>()?;
        DoorBoard::new(dimensions, tiles)
    }

    pub fn tile(&self, pos: &Pos) -> Option<Sides> {
        self.dimensions.node(pos).map(|node| self.tiles[node])
    }

    /// Whether one can step from `pos` towards `direction`: the side is open,
    /// the neighbor is on the board and its facing side is open too.
    pub fn has_path(&self, pos: &Pos, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let here = match self.tile(pos) {
            Some(sides) => sides,
            None => return false,
        };
        let there = match pos.offset(dx, dy).and_then(|next| self.tile(&next)) {
            Some(sides) => sides,
            None => return false,
        };
        here.is_open(direction) && there.is_open(direction.opposite())
    }

    /// Pushes row `line` (Left/Right) or column `line` (Up/Down) by one cell
    /// towards `direction`. `incoming` enters on the opposite edge. Returns
    /// the new board along with the tile that got pushed out; `self` is left
    /// untouched so several pushes can be evaluated from the same board.
    pub fn shifted(
        &self, line: usize, direction: Direction, incoming: Sides
        ) -> Result<(DoorBoard, Sides), BoardError> {
        let Dimensions { width, height } = self.dimensions;
        let (lines, length) = match direction {
            Direction::Left | Direction::Right => (height, width),
            Direction::Up | Direction::Down => (width, height),
        };
        if line >= lines {
            return Err(BoardError::LineOutOfRange { line, lines });
        }
        // Cell indices of the line, in increasing coordinate order.
        let cells: Vec<NodeId> = (0..length).map(|i| match direction {
            Direction::Left | Direction::Right => line * width + i,
            Direction::Up | Direction::Down => i * width + line,
        }).collect();
        let mut values: Vec<Sides> = cells.iter().map(|&c| self.tiles[c]).collect();
        let outgoing = match direction {
            Direction::Right | Direction::Down => {
                let out = values.pop();
                values.insert(0, incoming);
                out
            },
            Direction::Left | Direction::Up => {
                let out = values.remove(0);
                values.push(incoming);
                Some(out)
            },
        };
        let mut tiles = self.tiles.clone();
        for (&cell, sides) in cells.iter().zip(values) {
            tiles[cell] = sides;
        }
        // `length` is never 0 for a validated board.
        let outgoing = outgoing.unwrap_or(incoming);
        Ok((DoorBoard { dimensions: self.dimensions, tiles }, outgoing))
    }
}

/// Board given as explicit neighbor lists, one per cell. Cells can have any
/// number of neighbors (4 on square boards, 6 on hex boards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborBoard {
    pub dimensions: Dimensions,
    neighbors: Vec<Vec<NodeId>>,
}

impl NeighborBoard {
    /// Negative entries mark "no neighbor on this side" and are dropped.
    pub fn new(dimensions: Dimensions, raw: &[Vec<i64>]) -> Result<Self, BoardError> {
        check_dimensions(&dimensions, raw.len())?;
        let len = dimensions.len();
        let mut neighbors = Vec::with_capacity(len);
        for (cell, cell_neighbors) in raw.iter().enumerate() {
            let mut valid = Vec::with_capacity(cell_neighbors.len());
            for &neighbor in cell_neighbors {
                if neighbor < 0 {
                    continue;
                }
                if neighbor as usize >= len {
                    return Err(BoardError::NeighborOutOfRange { cell, neighbor, len });
                }
                valid.push(neighbor as NodeId);
            }
            neighbors.push(valid);
        }
        Ok(NeighborBoard { dimensions, neighbors })
    }

    pub fn neighbors(&self, cell: NodeId) -> &[NodeId] {
        &self.neighbors[cell]
    }
}

fn check_dimensions(dimensions: &Dimensions, cells: usize) -> Result<(), BoardError> {
    let len = check_size(dimensions)?;
    if len == 0 {
        return Err(BoardError::Empty {
            width: dimensions.width, height: dimensions.height });
    }
    if len != cells {
        return Err(BoardError::CellCount { expected: len, actual: cells });
    }
    Ok(())
}

/// Serialized form of a board, as read from disk or received from a game.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoardSnapshot {
    Doors { width: usize, height: usize, tiles: Vec<String> },
    Neighbors { width: usize, height: usize, neighbors: Vec<Vec<i64>> },
}

impl BoardSnapshot {
    pub fn dimensions(&self) -> Dimensions {
        match self {
            BoardSnapshot::Doors { width, height, .. } => Dimensions::new(*width, *height),
            BoardSnapshot::Neighbors { width, height, .. } => Dimensions::new(*width, *height),
        }
    }
}
