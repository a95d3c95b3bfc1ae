use log::debug;

use crate::board::{BoardError, BoardSnapshot, DoorBoard, NeighborBoard};
use crate::directions::Direction;
use crate::grid::{Dimensions, NodeId, Pos};

pub type Cost = u16;

/// Cost value meaning "no edge" in the adjacency matrix.
pub const NO_EDGE: Cost = 0;

/// Adjacency matrix over the cells of a board. Once built, a graph is only
/// read from, so it can be shared by any number of pathfinders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    dimensions: Dimensions,
    // adjacency[from * len + to]
    // Flattened so a row (all edges out of 'from') is contiguous, which is
    // what relaxation iterates over.
    adjacency: Vec<Cost>,
}

/// Number of vertices for a board of these dimensions, as long as its
/// adjacency matrix can be indexed.
pub(crate) fn check_size(dimensions: &Dimensions) -> Result<usize, BoardError> {
    let too_large = || BoardError::TooLarge {
        width: dimensions.width, height: dimensions.height };
    let len = dimensions.checked_len().ok_or_else(too_large)?;
    len.checked_mul(len)
        .filter(|&cells| cells <= isize::MAX as usize / std::mem::size_of::<Cost>())
        .ok_or_else(too_large)?;
    Ok(len)
}

impl Graph {
    fn empty(dimensions: Dimensions) -> Self {
        let len = dimensions.len();
        Graph { dimensions, adjacency: vec![NO_EDGE; len * len] }
    }

    #[inline]
    fn set(&mut self, from: NodeId, to: NodeId, cost: Cost) {
        let len = self.len();
        self.adjacency[from * len + to] = cost;
    }

    fn connect(&mut self, a: NodeId, b: NodeId) {
        if a != b {
            self.set(a, b, 1);
            self.set(b, a, 1);
        }
    }

    /// Directed, weighted edges. Self-loops and zero costs are dropped.
    pub fn from_edges<I>(dimensions: Dimensions, edges: I) -> Result<Self, BoardError>
        where I: IntoIterator<Item=(NodeId, NodeId, Cost)> {
        check_size(&dimensions)?;
        let mut graph = Graph::empty(dimensions);
        let len = graph.len();
        for (from, to, cost) in edges {
            if from >= len || to >= len {
                return Err(BoardError::NeighborOutOfRange {
                    cell: from, neighbor: to as i64, len });
            }
            graph.set(from, to, cost);
        }
        graph.remove_self_loops();
        graph.log_summary();
        Ok(graph)
    }

    /// Unit-cost, symmetric edges between each cell and its listed neighbors.
    pub fn from_neighbor_lists(board: &NeighborBoard) -> Self {
        let mut graph = Graph::empty(board.dimensions);
        for cell in 0..graph.len() {
            for &neighbor in board.neighbors(cell) {
                graph.connect(cell, neighbor);
            }
        }
        graph.log_summary();
        graph
    }

    /// Unit-cost, symmetric edges between adjacent cells whose facing sides
    /// are both open.
    pub fn from_door_board(board: &DoorBoard) -> Self {
        let dimensions = board.dimensions;
        let mut graph = Graph::empty(dimensions);
        for pos in dimensions.positions() {
            for direction in Direction::ALL {
                if !board.has_path(&pos, direction) {
                    continue;
                }
                let (dx, dy) = direction.delta();
                let here = dimensions.node(&pos);
                let there = pos.offset(dx, dy).and_then(|p| dimensions.node(&p));
                if let (Some(here), Some(there)) = (here, there) {
                    graph.connect(here, there);
                }
            }
        }
        graph.log_summary();
        graph
    }

    /// Clears the diagonal. The builders never produce self-loops; this is
    /// only needed for matrices assembled by hand, and is idempotent.
    pub fn remove_self_loops(&mut self) {
        for v in 0..self.len() {
            self.set(v, v, NO_EDGE);
        }
    }

    fn log_summary(&self) {
        let edges = self.adjacency.iter().filter(|&&c| c != NO_EDGE).count();
        debug!("Graph created: {} vertices, {} directed edges", self.len(), edges);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node < self.len()
    }

    /// Cost of the edge, NO_EDGE if there is none.
    #[inline]
    pub fn cost(&self, from: NodeId, to: NodeId) -> Cost {
        self.adjacency[from * self.len() + to]
    }

    #[inline]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.cost(from, to) != NO_EDGE
    }

    /// Outgoing edges of 'from', as (to, cost), in increasing node order.
    pub fn edges(&self, from: NodeId) -> impl Iterator<Item=(NodeId, Cost)> + '_ {
        let len = self.len();
        self.adjacency[from * len..(from + 1) * len].iter().enumerate()
            .filter(|&(_, &cost)| cost != NO_EDGE)
            .map(|(to, &cost)| (to, cost))
    }

    pub fn node(&self, pos: &Pos) -> Option<NodeId> {
        self.dimensions.node(pos)
    }

    pub fn pos(&self, node: NodeId) -> Pos {
        self.dimensions.pos(node)
    }

    pub fn points(&self, nodes: &[NodeId]) -> Vec<Pos> {
        nodes.iter().map(|&n| self.pos(n)).collect()
    }
}

/// Builds the graph of a serialized board. Every call returns an independent
/// graph, so hypothetical boards can be evaluated side by side.
pub fn build_graph(snapshot: &BoardSnapshot) -> Result<Graph, BoardError> {
    let dimensions = snapshot.dimensions();
    match snapshot {
        BoardSnapshot::Doors { tiles, .. } => {
            let board = DoorBoard::parse(dimensions, tiles)?;
            Ok(Graph::from_door_board(&board))
        },
        BoardSnapshot::Neighbors { neighbors, .. } => {
            let board = NeighborBoard::new(dimensions, neighbors)?;
            Ok(Graph::from_neighbor_lists(&board))
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Sides;
    use super::*;

    fn open_board(width: usize, height: usize) -> DoorBoard {
        DoorBoard::new(Dimensions::new(width, height),
                       vec![Sides::OPEN; width * height]).unwrap()
    }

    #[test]
    fn test_open_grid_edges() {
        let graph = Graph::from_door_board(&open_board(3, 3));
        assert_eq!(graph.len(), 9);
        // Center has 4 neighbors, corners 2.
        assert_eq!(graph.edges(4).map(|(to, _)| to).collect::<Vec<_>>(), vec![1, 3, 5, 7]);
        assert_eq!(graph.edges(0).count(), 2);
        for u in 0..graph.len() {
            assert!(!graph.has_edge(u, u));
            for v in 0..graph.len() {
                assert_eq!(graph.cost(u, v), graph.cost(v, u));
                assert!(graph.cost(u, v) <= 1);
            }
        }
        // No wrap around between rows.
        assert!(!graph.has_edge(2, 3));
    }

    #[test]
    fn test_closed_cell_is_isolated() {
        let mut tiles = vec![Sides::OPEN; 9];
        tiles[4] = Sides::CLOSED;
        let board = DoorBoard::new(Dimensions::new(3, 3), tiles).unwrap();
        let graph = Graph::from_door_board(&board);
        assert_eq!(graph.edges(4).count(), 0);
        assert!(!graph.has_edge(1, 4));
    }

    #[test]
    fn test_shifted_board_builds_independent_graph() {
        let board = open_board(3, 3);
        let before = Graph::from_door_board(&board);
        let (shifted, _) = board.shifted(1, Direction::Right, Sides::CLOSED).unwrap();
        let after = Graph::from_door_board(&shifted);
        assert!(before.has_edge(3, 4));
        assert!(!after.has_edge(3, 4));
        assert_eq!(before, Graph::from_door_board(&board));
    }

    #[test]
    fn test_neighbor_lists_symmetric() {
        // Only one side lists the edge, the graph still has both directions.
        let raw = vec![vec![1, -1, -1], vec![-1], vec![1, 2]];
        let board = NeighborBoard::new(Dimensions::new(3, 1), &raw).unwrap();
        let graph = Graph::from_neighbor_lists(&board);
        assert!(graph.has_edge(0, 1) && graph.has_edge(1, 0));
        assert!(graph.has_edge(2, 1) && graph.has_edge(1, 2));
        assert!(!graph.has_edge(2, 2));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn test_from_edges_drops_loops() {
        let graph = Graph::from_edges(Dimensions::new(3, 1),
                                      [(0, 0, 1), (0, 1, 2), (1, 2, 1)]).unwrap();
        assert!(!graph.has_edge(0, 0));
        assert_eq!(graph.cost(0, 1), 2);
        assert!(!graph.has_edge(1, 0));
        assert!(Graph::from_edges(Dimensions::new(3, 1), [(0, 3, 1)]).is_err());
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        assert!(matches!(Graph::from_edges(Dimensions::new(1 << 20, 1 << 20),
                                           Vec::<(NodeId, NodeId, Cost)>::new()),
                         Err(BoardError::TooLarge { .. })));
        let json = r#"{"kind": "neighbors", "width": 18446744073709551615, "height": 2,
                       "neighbors": [[1], [0]]}"#;
        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        assert!(matches!(build_graph(&snapshot), Err(BoardError::TooLarge { .. })));
    }

    #[test]
    fn test_build_graph_from_snapshot() {
        let json = r#"{"kind": "doors", "width": 2, "height": 1, "tiles": ["0100", "0001"]}"#;
        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        let graph = build_graph(&snapshot).unwrap();
        assert!(graph.has_edge(0, 1));
        let json = r#"{"kind": "doors", "width": 2, "height": 1, "tiles": ["0100"]}"#;
        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        assert!(build_graph(&snapshot).is_err());
    }
}
