// Coordinates on a rectangular board and the row-major mapping between them
// and graph node ids.

use serde::{Deserialize, Serialize};

pub type NodeId = usize;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Copy, Clone)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub fn new(x: u16, y: u16) -> Self {
        Pos { x, y }
    }

    /// Neighbor one step away by `(dx, dy)`, or None if it would go below 0.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Pos> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 || x > u16::MAX as i32 || y > u16::MAX as i32 {
            None
        } else {
            Some(Pos { x: x as u16, y: y as u16 })
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A destination as callers hand it to us. Games mark "not on the board" with
/// negative coordinates (e.g. an item held by a player), so those are kept
/// representable here and filtered out before planning.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Candidate {
    pub x: i32,
    pub y: i32,
}

impl Candidate {
    pub fn new(x: i32, y: i32) -> Self {
        Candidate { x, y }
    }

    pub fn to_pos(&self, dimensions: &Dimensions) -> Option<Pos> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let pos = Pos { x: self.x as u16, y: self.y as u16 };
        if (self.x as usize) < dimensions.width && (self.y as usize) < dimensions.height {
            Some(pos)
        } else {
            None
        }
    }
}

impl From<Pos> for Candidate {
    fn from(pos: Pos) -> Self {
        Candidate { x: pos.x as i32, y: pos.y as i32 }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Copy, Clone)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Dimensions { width, height }
    }

    /// Number of cells, i.e. number of graph vertices. Boards coming from
    /// outside are validated with `checked_len` first.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Number of cells, or None when it doesn't fit in a usize.
    pub fn checked_len(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, pos: &Pos) -> bool {
        (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    pub fn node(&self, pos: &Pos) -> Option<NodeId> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    // Caller guarantees node < len().
    #[inline]
    pub fn pos(&self, node: NodeId) -> Pos {
        Pos { x: (node % self.width) as u16, y: (node / self.width) as u16 }
    }

    pub fn positions(&self) -> impl Iterator<Item=Pos> + '_ {
        (0..self.len()).map(move |node| self.pos(node))
    }
}
