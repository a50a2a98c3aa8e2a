/// Console solver
///
/// Generates or loads a maze, runs search algorithms on it and compares
/// them.
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use maze_search::algorithms::Algorithm;
use maze_search::algorithms::solve;
use maze_search::metrics::Comparator;
use maze_search::metrics::Metric;
use maze_search::metrics::export_csv;
use maze_search::metrics::export_json;
use maze_search::problems::generators::GeneratorKind;
use maze_search::problems::generators::SolverConfig;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::problems::maze_2d::Maze2DState;
use maze_search::search::TraceObserver;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze file, text or PNG. A maze is generated when missing.
    #[arg(short, long)]
    pub maze: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = GeneratorKind::RandomWalls)]
    pub generator: GeneratorKind,
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
    #[arg(long, default_value_t = 30)]
    pub cols: usize,
    #[arg(long, default_value_t = 0.25)]
    pub wall_probability: f64,
    #[arg(long, default_value_t = 5)]
    pub rooms: usize,
    #[arg(short, long, default_value_t = 0u64)]
    pub seed: u64,

    /// Algorithms to run, like `bfs,astar-euclidean`. Runs the whole
    /// line-up when missing.
    #[arg(short, long, value_delimiter = ',')]
    pub algorithms: Vec<Algorithm>,

    /// Prints every run's path and explored cells over the maze.
    #[arg(long)]
    pub show_paths: bool,

    #[arg(long, env = "MAZE_SEARCH_JSON")]
    pub json: Option<PathBuf>,
    #[arg(long, env = "MAZE_SEARCH_CSV")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

impl Args {
    fn problem(&self) -> Result<Maze2DProblem, Box<dyn std::error::Error>> {
        if let Some(maze) = &self.maze {
            return Ok(Maze2DProblem::try_from(maze.as_path())?);
        }
        let config = SolverConfig {
            rows: self.rows,
            cols: self.cols,
            generator: self.generator,
            wall_probability: self.wall_probability,
            room_count: self.rooms,
            seed: self.seed,
            ..SolverConfig::default()
        };
        Ok(config.generate()?)
    }

    fn algorithms(&self) -> Vec<Algorithm> {
        if self.algorithms.is_empty() {
            Algorithm::lineup().to_vec()
        } else {
            self.algorithms.clone()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    args.color.write_global();

    let problem = args.problem()?;
    println!("{problem}");

    let mut comparator = Comparator::<Maze2DState>::new();
    for algorithm in args.algorithms() {
        let mut trace = TraceObserver::new();
        let result = solve(&problem, algorithm, &mut trace);
        if result.path_found() {
            println!("{}", result.green());
        } else {
            println!("{}", result.red());
        }
        if args.show_paths {
            println!("{}", problem.render(result.path.as_ref(), &trace.expanded));
        }
        comparator.add(result);
    }

    println!();
    println!("{}", "Comparison".bold());
    println!("{comparator}");
    for metric in [Metric::ExecutionTime, Metric::NodesExplored] {
        match comparator.best_by(metric) {
            Some(best) => println!("Best by {metric}: {}", best.algorithm.name().cyan()),
            None => println!("Best by {metric}: {}", "no path found".yellow()),
        }
    }

    let records = comparator.records();
    if let Some(json) = &args.json {
        println!("Writing JSON results to {:?}", json.yellow());
        export_json(&records, BufWriter::new(File::create(json)?))?;
    }
    if let Some(csv) = &args.csv {
        println!("Writing CSV results to {:?}", csv.yellow());
        export_csv(&records, BufWriter::new(File::create(csv)?))?;
    }

    Ok(())
}
