// Cardinal directions on the board and conversion of coordinate paths into
// step tokens.
use crate::grid::Pos;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Clockwise, starting from Up. Also the order of sides in tile strings.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// (dx, dy) of one step, with y growing downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Direction of the step from `from` to `to`. Horizontal movement wins
    /// over vertical, and no movement gives None.
    pub fn between(from: &Pos, to: &Pos) -> Option<Direction> {
        if to.x > from.x { Some(Direction::Right) }
        else if to.x < from.x { Some(Direction::Left) }
        else if to.y > from.y { Some(Direction::Down) }
        else if to.y < from.y { Some(Direction::Up) }
        else { None }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
        };
        f.write_str(name)
    }
}

/// One token per consecutive pair of points. Repeated points (e.g. the joint
/// between two concatenated legs) produce nothing, and so does a path with
/// less than two points.
pub fn to_directions(points: &[Pos]) -> Vec<Direction> {
    points.windows(2)
        .filter_map(|pair| Direction::between(&pair[0], &pair[1]))
        .collect()
}
