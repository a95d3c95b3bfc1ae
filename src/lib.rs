//! Shortest paths and multi-destination routes on 2D game boards.
//!
//! A board snapshot is turned into a [`graph::Graph`], solved from one or
//! more sources with [`pathfinding::Pathfinder`], and the order in which to
//! visit destinations is picked by [`route::RouteOptimizer`]. The resulting
//! coordinate path can be turned into step tokens with
//! [`directions::to_directions`].

pub mod board;
pub mod config;
pub mod directions;
pub mod graph;
pub mod grid;
pub mod pathfinding;
pub mod request;
pub mod route;
pub mod solvers;

pub use directions::to_directions;
pub use graph::build_graph;
pub use route::find_best_chain;
