/// Report tool
///
/// Runs the algorithm line-up over many seeded mazes and writes the
/// aggregates as an org-mode document.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use tqdm::tqdm;
use tracing_subscriber::EnvFilter;

use maze_search::algorithms::run_all;
use maze_search::algorithms::run_all_parallel;
use maze_search::metrics::Dashboard;
use maze_search::problems::generators::GeneratorKind;
use maze_search::problems::generators::SolverConfig;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_GENERATORS: [GeneratorKind; 3] = [
    GeneratorKind::RandomWalls,
    GeneratorKind::Perfect,
    GeneratorKind::Rooms,
];

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, env = "MAZE_SEARCH_REPORT", default_value = "logs/report.org")]
    pub output: PathBuf,

    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_GENERATORS)]
    pub generators: Vec<GeneratorKind>,

    /// Instances per generator, seeded `0..num_instances`.
    #[arg(long, default_value_t = 100u64)]
    pub num_instances: u64,
    #[arg(long, default_value_t = 41)]
    pub rows: usize,
    #[arg(long, default_value_t = 61)]
    pub cols: usize,

    /// Runs the algorithms of each instance on their own threads.
    #[arg(long)]
    pub parallel: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn write_header<W: Write>(out: &mut W, args: &Args) -> std::io::Result<()> {
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", maze_search::build::PKG_VERSION)?;
    writeln!(out, ":GIT_BRANCH: {:?}", shadow_rs::branch())?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    if maze_search::build::GIT_CLEAN {
        writeln!(out, ":GIT_STATUS: CLEAN")?;
    } else {
        writeln!(out, ":GIT_STATUS: DIRTY")?;
    }
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: Maze search report")?;
    writeln!(
        out,
        "#+date: {}",
        chrono::Local::now().format("[%Y-%m-%d %a %H:%M]")
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{} instances of {}x{} per generator.",
        args.num_instances, args.rows, args.cols
    )?;
    writeln!(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    args.color.write_global();
    println!("Writing report to {:?}", args.output.green());

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);
    write_header(&mut out, &args)?;

    let mut overall = Dashboard::new();
    let mut stopwatch = Stopwatch::new_started();
    for &generator in &args.generators {
        let mut dashboard = Dashboard::new();
        for seed in tqdm(0..args.num_instances).desc(Some(format!("{generator} mazes"))) {
            let config = SolverConfig {
                rows: args.rows,
                cols: args.cols,
                generator,
                seed,
                ..SolverConfig::default()
            };
            let problem = config.generate()?;
            let results = match args.parallel {
                true => run_all_parallel(&problem),
                false => run_all(&problem),
            };
            dashboard.add_problem(&results);
            overall.add_problem(&results);
        }

        writeln!(out, "* {generator}")?;
        writeln!(out, "{dashboard}")?;
    }
    stopwatch.stop();

    writeln!(out, "* Overall")?;
    writeln!(out, "{overall}")?;
    writeln!(
        out,
        "{} problems solved in {}.",
        overall.problems(),
        human_duration(&stopwatch.elapsed())
    )?;
    out.flush()?;

    println!(
        "Ran {} problems in {}",
        overall.problems().cyan(),
        human_duration(&stopwatch.elapsed())
    );
    Ok(())
}
