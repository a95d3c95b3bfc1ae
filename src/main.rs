use clap::{Parser, ValueEnum};
use env_logger::Env;
use itertools::Itertools;
use log::{error, info};

use grid_route::config::PlannerConfig;
use grid_route::request::{PlanError, PlanRequest};
use grid_route::solvers::{ChainPlanner, ClosestPlanner, Planner};

#[derive(ValueEnum, Clone)]
enum PlannerName {
    /// Best ordered chain of destinations, most destinations first.
    Chain,
    /// Nearest reachable destination only.
    Closest,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Plan request JSON file (board, source and destinations).
    #[arg(short, long)]
    board: String,

    /// Planner implementation to use to find a route.
    #[arg(short, long, value_enum, default_value_t = PlannerName::Chain)]
    planner: PlannerName,

    /// Planner config JSON file.
    #[arg(long)]
    config: Option<String>,

    /// When using chain, overrides the config's max number of waypoints.
    #[arg(long)]
    max_waypoints: Option<usize>,
}

fn load_config(cli: &Cli) -> Result<PlannerConfig, PlanError> {
    let mut config = match &cli.config {
        Some(filename) => PlannerConfig::from_file(filename)?,
        None => {
            info!("[CONFIG] Using default planner config.");
            PlannerConfig::default()
        },
    };
    if let Some(max_waypoints) = cli.max_waypoints {
        config.max_waypoints = max_waypoints;
    }
    Ok(config.validate()?)
}

fn new_planner(cli: &Cli) -> Result<Box<dyn Planner>, PlanError> {
    Ok(match cli.planner {
        PlannerName::Chain => Box::new(ChainPlanner::new(load_config(cli)?)),
        PlannerName::Closest => Box::new(ClosestPlanner),
    })
}

fn run(cli: &Cli) -> Result<(), PlanError> {
    let mut planner = new_planner(cli)?;
    let request = PlanRequest::from_file(&cli.board)?;
    info!("Planning from {} to {} candidate(s)", request.source, request.destinations.len());
    match request.plan(planner.as_mut())? {
        Some(route) => {
            for leg in &route.legs {
                info!("  go to {goal} in {cost} steps", goal = leg.goal, cost = leg.cost);
            }
            println!("{}", route.directions().iter().join(" "));
        },
        None => {
            info!("Nothing reachable, staying put.");
            println!();
        },
    }
    Ok(())
}

fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        error!("Error while planning a route with underlying error:");
        error!("  {}", err);
        std::process::exit(1);
    }
}
