// Picks the order in which to visit a few destinations.
//
// Every ordered chain of up to 'max_waypoints' distinct destinations is
// considered (at most 3, so brute force is cheap). The best chain is the one
// visiting the most destinations, then the one with the shortest total
// distance. Destinations are sorted by node id before enumerating, so among
// equally good chains the lexicographically smallest (by node id) wins.

use arrayvec::ArrayVec;
use itertools::Itertools;
use log::{debug, info};

use crate::config::{PlannerConfig, MAX_WAYPOINTS};
use crate::directions::{to_directions, Direction};
use crate::graph::Graph;
use crate::grid::{Candidate, NodeId, Pos};
use crate::pathfinding::{Distance, Path, PathError, Pathfinder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub waypoints: ArrayVec<Pos, MAX_WAYPOINTS>,
    /// legs[0] goes from the source to waypoints[0], legs[i] from
    /// waypoints[i-1] to waypoints[i].
    pub legs: Vec<Path>,
    /// Sum of the leg costs.
    pub cost: u64,
}

impl Route {
    pub fn reached(&self) -> usize {
        self.waypoints.len()
    }

    /// All the steps of the route, without repeating the point joining two
    /// legs.
    pub fn points(&self) -> Vec<Pos> {
        let mut points = Vec::new();
        for leg in &self.legs {
            let skip = if points.is_empty() { 0 } else { 1 };
            points.extend(leg.steps.iter().skip(skip));
        }
        points
    }

    pub fn directions(&self) -> Vec<Direction> {
        to_directions(&self.points())
    }
}

// Chain under evaluation, as indices into the sorted destinations.
struct Chain {
    order: ArrayVec<usize, MAX_WAYPOINTS>,
    cost: u64,
}

/// Valid destination nodes: sentinels and off-board candidates are dropped,
/// duplicates removed, sorted by node id.
pub fn valid_destinations(graph: &Graph, destinations: &[Candidate]) -> Vec<NodeId> {
    destinations.iter()
        .filter_map(|c| c.to_pos(graph.dimensions()))
        .filter_map(|p| graph.node(&p))
        .sorted()
        .dedup()
        .collect()
}

pub struct RouteOptimizer<'g> {
    graph: &'g Graph,
    config: PlannerConfig,
}

impl<'g> RouteOptimizer<'g> {
    pub fn new(graph: &'g Graph, config: PlannerConfig) -> Self {
        RouteOptimizer { graph, config }
    }

    fn source_node(&self, source: &Pos) -> Result<NodeId, PathError> {
        self.graph.node(source).ok_or(PathError::OffBoard { pos: *source })
    }

    /// Best chain from 'source', or None when no destination is reachable
    /// (including when none of them is valid).
    pub fn find_best_chain(
        &self, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError> {
        let source_node = self.source_node(&source)?;
        let targets = valid_destinations(self.graph, destinations);
        if targets.is_empty() {
            info!("[ROUTE] No valid destination among {} candidates", destinations.len());
            return Ok(None);
        }

        let mut from_source = Pathfinder::new(self.graph, source_node)?;
        from_source.solve();
        // from_targets[i] is rooted at targets[i].
        let mut from_targets: Vec<Pathfinder<'g>> = Vec::with_capacity(targets.len());
        for &target in &targets {
            let mut pathfinder = Pathfinder::new(self.graph, target)?;
            pathfinder.solve();
            from_targets.push(pathfinder);
        }

        // first_leg[i]: source -> targets[i]
        // legs[i][j]: targets[i] -> targets[j]
        let first_leg: Vec<Option<Distance>> = targets.iter()
            .map(|&t| from_source.distance_to(t)).collect();
        let legs: Vec<Vec<Option<Distance>>> = from_targets.iter_mut()
            .map(|pathfinder| targets.iter().map(|&to| pathfinder.distance_to(to)).collect())
            .collect();
        for (target, cost) in targets.iter().zip(&first_leg) {
            match cost {
                Some(cost) => debug!("[ROUTE] Path found to {} ({} steps)",
                                     self.graph.pos(*target), cost),
                None => debug!("[ROUTE] No path to {}", self.graph.pos(*target)),
            }
        }

        let chain_cost = |order: &[usize]| -> Option<u64> {
            let mut total = u64::from(first_leg[order[0]]?);
            for pair in order.windows(2) {
                total += u64::from(legs[pair[0]][pair[1]]?);
            }
            Some(total)
        };

        let max_waypoints = self.config.max_waypoints.min(MAX_WAYPOINTS).min(targets.len());
        let mut best: Option<Chain> = None;
        for size in 1..=max_waypoints {
            for order in (0..targets.len()).permutations(size) {
                let cost = match chain_cost(&order) {
                    Some(cost) => cost,
                    None => continue,
                };
                let better = match &best {
                    Some(chain) => order.len() > chain.order.len()
                        || (order.len() == chain.order.len() && cost < chain.cost),
                    None => true,
                };
                if better {
                    best = Some(Chain { order: order.into_iter().collect(), cost });
                }
            }
        }

        let best = match best {
            Some(chain) => chain,
            None => {
                info!("[ROUTE] None of the {} destinations is reachable from {}",
                      targets.len(), source);
                return Ok(None);
            },
        };

        let mut route_legs = Vec::with_capacity(best.order.len());
        let mut previous: Option<usize> = None;
        for &i in &best.order {
            let leg = match previous {
                None => from_source.path(targets[i])?,
                Some(from) => from_targets[from].path(targets[i])?,
            };
            route_legs.push(leg);
            previous = Some(i);
        }
        let route = Route {
            waypoints: best.order.iter().map(|&i| self.graph.pos(targets[i])).collect(),
            legs: route_legs,
            cost: best.cost,
        };
        info!("[ROUTE] Recovering {} of {} destinations in {} steps: {:?}",
              route.reached(), targets.len(), route.cost, route.waypoints);
        Ok(Some(route))
    }

    /// Route to the single nearest destination.
    pub fn find_closest(
        &self, source: Pos, destinations: &[Candidate]
        ) -> Result<Option<Route>, PathError> {
        let source_node = self.source_node(&source)?;
        let targets = valid_destinations(self.graph, destinations);
        let mut pathfinder = Pathfinder::new(self.graph, source_node)?;
        pathfinder.solve();
        Ok(pathfinder.path_to_closest(&targets).map(|path| {
            info!("[ROUTE] Closest destination is {} ({} steps)", path.goal, path.cost);
            Route {
                waypoints: ArrayVec::from_iter([path.goal]),
                cost: u64::from(path.cost),
                legs: vec![path],
            }
        }))
    }
}

/// Steps of the best chain from 'source' through 'destinations', with the
/// default config. Empty when nothing is reachable.
pub fn find_best_chain(
    graph: &Graph, source: Pos, destinations: &[Candidate]
    ) -> Result<Vec<Pos>, PathError> {
    let optimizer = RouteOptimizer::new(graph, PlannerConfig::default());
    Ok(optimizer.find_best_chain(source, destinations)?
        .map(|route| route.points())
        .unwrap_or_default())
}
