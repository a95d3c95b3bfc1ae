// Different planner implementations to pick where to go this turn.

use log::{info, warn};
use std::time::Instant;

use crate::config::PlannerConfig;
use crate::graph::Graph;
use crate::grid::{Candidate, Pos};
use crate::pathfinding::PathError;
use crate::route::{Route, RouteOptimizer};

pub trait Planner {
    // Name to display for this planner.
    fn name(&self) -> &str;

    // Implementation of the planner.
    fn do_plan(
        &mut self, graph: &Graph, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError>;

    // Wrapper to do_plan, to log timing and route information.
    fn plan(
        &mut self, graph: &Graph, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError> {
        let start = Instant::now();
        let route = self.do_plan(graph, source, destinations);
        info!("Planner {} took {:?}", self.name(), start.elapsed());
        match &route {
            Ok(Some(route)) => info!(
                "Planner {} reaches {} destination(s) in {} steps",
                self.name(), route.reached(), route.cost),
            Ok(None) => warn!("Planner {} did NOT find a route.", self.name()),
            Err(err) => warn!("Planner {} failed: {}", self.name(), err),
        };
        route
    }
}

// Goes to the nearest reachable destination, ignoring the others.
pub struct ClosestPlanner;

// Tries every ordered chain of up to 'max_waypoints' destinations, keeps the
// one reaching the most of them in the fewest steps.
pub struct ChainPlanner {
    config: PlannerConfig,
}

impl ChainPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        ChainPlanner { config }
    }
}

impl Default for ChainPlanner {
    fn default() -> Self {
        ChainPlanner::new(PlannerConfig::default())
    }
}

impl Planner for ClosestPlanner {
    fn name(&self) -> &str {
        "closest"
    }

    fn do_plan(
        &mut self, graph: &Graph, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError> {
        RouteOptimizer::new(graph, PlannerConfig::default())
            .find_closest(source, destinations)
    }
}

impl Planner for ChainPlanner {
    fn name(&self) -> &str {
        "chain"
    }

    fn do_plan(
        &mut self, graph: &Graph, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError> {
        RouteOptimizer::new(graph, self.config.clone())
            .find_best_chain(source, destinations)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{DoorBoard, Sides};
    use crate::grid::Dimensions;
    use super::*;

    #[test]
    fn test_planners_agree_on_single_destination() {
        let board = DoorBoard::new(Dimensions::new(4, 4), vec![Sides::OPEN; 16]).unwrap();
        let graph = Graph::from_door_board(&board);
        let destinations = [Candidate::new(3, 2), Candidate::new(-1, -1)];
        let mut planners: Vec<Box<dyn Planner>> = vec![
            Box::new(ClosestPlanner), Box::new(ChainPlanner::default())];
        let routes: Vec<Route> = planners.iter_mut()
            .map(|p| p.plan(&graph, Pos::new(0, 0), &destinations).unwrap().unwrap())
            .collect();
        assert_eq!(routes[0], routes[1]);
        assert_eq!(routes[0].cost, 5);
    }

    #[test]
    fn test_chain_planner_prefers_more_destinations() {
        let board = DoorBoard::new(Dimensions::new(4, 1), vec![Sides::OPEN; 4]).unwrap();
        let graph = Graph::from_door_board(&board);
        let destinations = [Candidate::new(1, 0), Candidate::new(3, 0)];
        let closest = ClosestPlanner.plan(&graph, Pos::new(0, 0), &destinations)
            .unwrap().unwrap();
        assert_eq!(closest.reached(), 1);
        let chain = ChainPlanner::default().plan(&graph, Pos::new(0, 0), &destinations)
            .unwrap().unwrap();
        assert_eq!(chain.reached(), 2);
        assert_eq!(chain.cost, 3);
    }
}
