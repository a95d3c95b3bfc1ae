// Single-source shortest paths on a Graph (Dijkstra).
//
// A Pathfinder is tied to one (graph, source) pair. It can either solve the
// whole graph, or stop as soon as one destination is finalized. Queries on a
// node that a partial solve did not finalize transparently re-run a full
// solve first, so answers never depend on which kind of solve was done.

use log::{debug, trace};
use priority_queue::PriorityQueue;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use thiserror::Error;

use crate::graph::Graph;
use crate::grid::{NodeId, Pos};

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum PathError {
    #[error("No path from node {from} to node {to}")]
    Unreachable { from: NodeId, to: NodeId },
    #[error("Node {node} is not on the graph ({len} nodes)")]
    InvalidNode { node: NodeId, len: usize },
    #[error("Position {pos} is off the board")]
    OffBoard { pos: Pos },
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SolveState {
    Unsolved,
    /// Stopped right after this node was finalized.
    SolvedUntil(NodeId),
    Solved,
}

/// Sum of edge costs along a path. Wider than `Cost` so long paths over
/// expensive edges don't wrap.
pub type Distance = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub steps: Vec<Pos>,
    pub cost: Distance,
    pub goal: Pos,
}

// Min-heap on (distance, node): among equal distances the lowest node index
// pops first, which fixes predecessors on ties.
type Frontier = PriorityQueue<NodeId, Reverse<(Distance, NodeId)>>;

pub struct Pathfinder<'g> {
    graph: &'g Graph,
    source: NodeId,

    // None while unreached.
    distance: Vec<Option<Distance>>,
    // The source is its own predecessor.
    predecessor: Vec<Option<NodeId>>,
    finalized: Vec<bool>,
    state: SolveState,
}

impl<'g> Pathfinder<'g> {
    pub fn new(graph: &'g Graph, source: NodeId) -> Result<Self, PathError> {
        if !graph.contains(source) {
            return Err(PathError::InvalidNode { node: source, len: graph.len() });
        }
        Ok(Pathfinder {
            graph,
            source,
            distance: vec![None; graph.len()],
            predecessor: vec![None; graph.len()],
            finalized: vec![false; graph.len()],
            state: SolveState::Unsolved,
        })
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn check(&self, node: NodeId) -> Result<(), PathError> {
        if self.graph.contains(node) {
            Ok(())
        } else {
            Err(PathError::InvalidNode { node, len: self.graph.len() })
        }
    }

    fn reset(&mut self) {
        self.distance.fill(None);
        self.predecessor.fill(None);
        self.finalized.fill(false);
        self.distance[self.source] = Some(0);
        self.predecessor[self.source] = Some(self.source);
        self.state = SolveState::Unsolved;
    }

    fn dijkstra(&mut self, stop_at: Option<NodeId>) {
        self.reset();

        let mut frontier = Frontier::new();
        frontier.push(self.source, Reverse((0, self.source)));

        while let Some((current, Reverse((cost, _)))) = frontier.pop() {
            self.finalized[current] = true;

            for (next, edge_cost) in self.graph.edges(current) {
                if self.finalized[next] {
                    continue;
                }
                let Some(new_cost) = cost.checked_add(Distance::from(edge_cost)) else {
                    trace!("Distance overflow from {} to {}", current, next);
                    continue;
                };
                let improves = match self.distance[next] {
                    Some(old_cost) => new_cost < old_cost,
                    None => true,
                };
                if improves {
                    self.distance[next] = Some(new_cost);
                    self.predecessor[next] = Some(current);
                    // Updates the priority if 'next' is already queued.
                    frontier.push(next, Reverse((new_cost, next)));
                }
            }

            if stop_at == Some(current) {
                self.state = SolveState::SolvedUntil(current);
                return;
            }
        }
        self.state = SolveState::Solved;
    }

    /// Finalizes every node reachable from the source.
    pub fn solve(&mut self) {
        self.dijkstra(None);
        debug!("Solved from {}: {} of {} nodes reachable", self.source,
               self.finalized.iter().filter(|&&f| f).count(), self.graph.len());
    }

    /// Same as solve(), but stops right after 'destination' is finalized.
    /// Other nodes may be left with tentative values.
    pub fn solve_until(&mut self, destination: NodeId) -> Result<(), PathError> {
        self.check(destination)?;
        self.dijkstra(Some(destination));
        if self.state == SolveState::Solved {
            debug!("Solve from {} ran out of nodes before reaching {}",
                   self.source, destination);
        }
        Ok(())
    }

    // Makes sure the values for 'node' are final, re-solving from scratch when
    // a partial solve did not get to it.
    fn ensure_finalized(&mut self, node: NodeId) {
        let ready = match self.state {
            SolveState::Solved => true,
            SolveState::SolvedUntil(_) => self.finalized[node],
            SolveState::Unsolved => false,
        };
        if !ready {
            trace!("Node {} not finalized from {} ({:?}), running a full solve",
                   node, self.source, self.state);
            self.solve();
        }
    }

    pub fn is_finalized(&self, node: NodeId) -> bool {
        self.finalized.get(node).copied().unwrap_or(false)
    }

    /// Raw predecessor from the last solve, without resuming a partial one.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(node).copied().flatten()
    }

    /// Shortest distance, or None if 'node' can't be reached.
    pub fn distance_to(&mut self, node: NodeId) -> Option<Distance> {
        if self.check(node).is_err() {
            return None;
        }
        self.ensure_finalized(node);
        self.distance[node]
    }

    pub fn has_path_to(&mut self, node: NodeId) -> bool {
        if self.check(node).is_err() {
            return false;
        }
        self.ensure_finalized(node);
        node == self.source || self.predecessor[node].is_some()
    }

    /// Nodes from the source to 'node', both included.
    pub fn path_to(&mut self, node: NodeId) -> Result<Vec<NodeId>, PathError> {
        self.check(node)?;
        self.ensure_finalized(node);
        let mut steps = vec![node];
        let mut current = node;
        while current != self.source {
            current = self.predecessor[current].ok_or(
                PathError::Unreachable { from: self.source, to: node })?;
            steps.push(current);
        }
        steps.reverse();
        Ok(steps)
    }

    pub fn points_to(&mut self, node: NodeId) -> Result<Vec<Pos>, PathError> {
        let steps = self.path_to(node)?;
        Ok(self.graph.points(&steps))
    }

    pub fn path(&mut self, node: NodeId) -> Result<Path, PathError> {
        let steps = self.points_to(node)?;
        // path_to succeeded, so the distance is set.
        let cost = self.distance[node].unwrap_or_default();
        Ok(Path { steps, cost, goal: self.graph.pos(node) })
    }

    /// Paths to each reachable target. Unreachable targets are left out.
    pub fn paths_to_all_targets(&mut self, targets: &[NodeId]) -> FxHashMap<NodeId, Path> {
        let mut out = FxHashMap::default();
        for &target in targets {
            match self.path(target) {
                Ok(path) => {
                    out.insert(target, path);
                },
                Err(err) => debug!("Skipping target {}: {}", target, err),
            }
        }
        out
    }

    /// Path to the nearest reachable target (lowest node on ties).
    pub fn path_to_closest(&mut self, targets: &[NodeId]) -> Option<Path> {
        let closest = targets.iter()
            .filter_map(|&t| self.distance_to(t).map(|d| (d, t)))
            .min()?;
        self.path(closest.1).ok()
    }
}

/// One-off shortest path between two nodes, stopping as soon as 'to' is found.
pub fn shortest_path(graph: &Graph, from: NodeId, to: NodeId) -> Result<Vec<NodeId>, PathError> {
    let mut pathfinder = Pathfinder::new(graph, from)?;
    pathfinder.solve_until(to)?;
    pathfinder.path_to(to)
}
