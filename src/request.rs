// A planning request as stored on disk: a board snapshot, where we stand and
// where we would like to go.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{BoardError, BoardSnapshot};
use crate::config::ConfigError;
use crate::graph::{build_graph, Graph};
use crate::grid::{Candidate, Pos};
use crate::pathfinding::PathError;
use crate::route::Route;
use crate::solvers::Planner;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed reading the request")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing the request")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid board ({0})")]
    BoardError(#[from] BoardError),
    #[error("Invalid config ({0})")]
    ConfigError(#[from] ConfigError),
    #[error("Planning failed ({0})")]
    PathError(#[from] PathError),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PlanRequest {
    pub board: BoardSnapshot,
    pub source: Pos,
    pub destinations: Vec<Candidate>,
}

impl PlanRequest {
    pub fn from_json(data: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_file(filename: &str) -> Result<Self, PlanError> {
        let data = std::fs::read_to_string(filename)?;
        PlanRequest::from_json(&data)
    }

    pub fn graph(&self) -> Result<Graph, PlanError> {
        Ok(build_graph(&self.board)?)
    }

    pub fn plan(&self, planner: &mut dyn Planner) -> Result<Option<Route>, PlanError> {
        let graph = self.graph()?;
        Ok(planner.plan(&graph, self.source, &self.destinations)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::solvers::ChainPlanner;
    use super::*;

    fn load(filename: &str) -> PlanRequest {
        // Note this isn't great, we ideally shouldn't read from disk here.
        PlanRequest::from_file(filename).expect("Couldn't read request file")
    }

    #[test]
    fn test_xmas_rush_board() {
        let request = load("./boards/xmas_rush.json");
        let graph = request.graph().unwrap();
        assert_eq!(graph.len(), 49);
        let valid = request.destinations.iter()
            .filter(|c| c.to_pos(graph.dimensions()).is_some()).count();
        assert_eq!(valid, 4);

        // (0,6) is walled off, the other three fit in one chain.
        let route = request.plan(&mut ChainPlanner::default()).unwrap().unwrap();
        assert_eq!(route.waypoints.as_slice(),
                   &[Pos::new(6, 2), Pos::new(5, 6), Pos::new(0, 1)]);
        assert_eq!(route.cost, 19);
        assert_eq!(route.legs.iter().map(|leg| leg.cost).collect::<Vec<_>>(), vec![4, 5, 10]);
        let points = route.points();
        assert_eq!(points.len(), 20);
        assert_eq!(&points[..5], &[Pos::new(3, 3), Pos::new(4, 3), Pos::new(4, 2),
                                   Pos::new(5, 2), Pos::new(6, 2)]);
        for pair in points.windows(2) {
            let a = graph.node(&pair[0]).unwrap();
            let b = graph.node(&pair[1]).unwrap();
            assert!(graph.has_edge(a, b), "no edge {} -> {}", pair[0], pair[1]);
        }
        let directions = route.directions().iter().map(|d| d.to_string()).collect::<Vec<_>>();
        assert_eq!(directions.join(" "),
                   "RIGHT UP RIGHT RIGHT DOWN LEFT DOWN DOWN DOWN UP UP LEFT LEFT LEFT UP UP LEFT UP LEFT");
    }

    #[test]
    fn test_xmas_rush_walled_off() {
        let mut request = load("./boards/xmas_rush.json");
        request.destinations = vec![Candidate::new(0, 6), Candidate::new(-1, -1)];
        assert_eq!(request.plan(&mut ChainPlanner::default()).unwrap(), None);
    }

    #[test]
    fn test_hex_flower_board() {
        let request = load("./boards/hex_flower.json");
        let route = request.plan(&mut ChainPlanner::default()).unwrap().unwrap();
        assert_eq!(route.waypoints.as_slice(), &[Pos::new(3, 0), Pos::new(4, 0)]);
        assert_eq!(route.cost, 3);
        assert_eq!(route.points(),
                   vec![Pos::new(1, 0), Pos::new(0, 0), Pos::new(3, 0), Pos::new(4, 0)]);
    }

    #[test]
    fn test_bad_requests() {
        assert!(matches!(PlanRequest::from_json("{}"), Err(PlanError::ParseError(_))));
        assert!(matches!(PlanRequest::from_file("./boards/missing.json"),
                         Err(PlanError::ReadError(_))));
        let request = PlanRequest::from_json(r#"{
            "board": {"kind": "doors", "width": 2, "height": 1, "tiles": ["0100", "01"]},
            "source": {"x": 0, "y": 0},
            "destinations": []
        }"#).unwrap();
        assert!(matches!(request.plan(&mut ChainPlanner::default()),
                         Err(PlanError::BoardError(BoardError::InvalidTile { .. }))));
        let request = PlanRequest::from_json(r#"{
            "board": {"kind": "doors", "width": 2, "height": 1, "tiles": ["0100", "0001"]},
            "source": {"x": 5, "y": 0},
            "destinations": [{"x": 1, "y": 0}]
        }"#).unwrap();
        assert!(matches!(request.plan(&mut ChainPlanner::default()),
                         Err(PlanError::PathError(PathError::OffBoard { .. }))));
    }
}
