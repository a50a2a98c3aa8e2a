//! Search results and their comparison.

use std::io::Write;
use std::time::Duration;

use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use thousands::Separable;

use crate::algorithms::Algorithm;
use crate::heuristics::Heuristic;
use crate::space::Path;
use crate::space::State;

/// The outcome of running one algorithm on one problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<St>
where
    St: State,
{
    pub algorithm: Algorithm,
    /// `None` when the goal can't be reached.
    pub path: Option<Path<St>>,
    /// Number of expansions.
    pub nodes_explored: usize,
    /// Time spent in the search loop.
    pub elapsed: Duration,
    pub max_frontier_size: usize,
    /// Estimated peak memory held by the frontier and the search trees.
    pub memory_bytes: usize,
}

impl<St> SearchResult<St>
where
    St: State,
{
    pub fn path_found(&self) -> bool {
        self.path.is_some()
    }
    /// Number of states in the path, 0 without one.
    pub fn path_length(&self) -> usize {
        self.path.as_ref().map_or(0, Path::len)
    }
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
    pub fn memory_kb(&self) -> f64 {
        self.memory_bytes as f64 / 1024.0
    }
    pub fn is_optimal(&self) -> bool {
        self.algorithm.is_optimal()
    }
    pub fn heuristic(&self) -> Option<Heuristic> {
        self.algorithm.heuristic()
    }

    pub fn record(&self) -> ResultRecord {
        ResultRecord {
            algorithm: self.algorithm.name(),
            nodes_explored: self.nodes_explored,
            path_length: self.path_length(),
            execution_time_ms: (self.elapsed_ms() * 1000.0).round() / 1000.0,
            memory_kb: (self.memory_kb() * 100.0).round() / 100.0,
            is_optimal: self.is_optimal(),
            path_found: self.path_found(),
            time_complexity: self.algorithm.time_complexity().to_string(),
            space_complexity: self.algorithm.space_complexity().to_string(),
            max_frontier_size: self.max_frontier_size,
            heuristic: self.heuristic().map(|h| h.to_string()),
        }
    }
}

impl<St> std::fmt::Display for SearchResult<St>
where
    St: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {} nodes explored, {:.3}ms, {:.2}KB, ",
            self.algorithm,
            self.nodes_explored.separate_with_commas(),
            self.elapsed_ms(),
            self.memory_kb()
        )?;
        match &self.path {
            Some(p) => write!(f, "path of {} states", p.len()),
            None => write!(f, "no path"),
        }
    }
}

/// The exported shape of a `SearchResult`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub algorithm: String,
    pub nodes_explored: usize,
    pub path_length: usize,
    pub execution_time_ms: f64,
    pub memory_kb: f64,
    pub is_optimal: bool,
    pub path_found: bool,
    pub time_complexity: String,
    pub space_complexity: String,
    pub max_frontier_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<String>,
}

const CSV_HEADER: &str = "algorithm,nodes_explored,path_length,execution_time_ms,memory_kb,is_optimal,path_found,time_complexity,space_complexity,max_frontier_size,heuristic";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error while exporting: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn export_json<W: Write>(records: &[ResultRecord], mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, records)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Quotes a field if it would break the row.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn export_csv<W: Write>(records: &[ResultRecord], mut out: W) -> Result<(), ExportError> {
    writeln!(out, "{CSV_HEADER}")?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&r.algorithm),
            r.nodes_explored,
            r.path_length,
            r.execution_time_ms,
            r.memory_kb,
            r.is_optimal,
            r.path_found,
            csv_field(&r.time_complexity),
            csv_field(&r.space_complexity),
            r.max_frontier_size,
            r.heuristic.as_deref().map(csv_field).unwrap_or_default(),
        )?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum Metric {
    #[display("execution time")]
    ExecutionTime,
    #[display("nodes explored")]
    NodesExplored,
    #[display("path length")]
    PathLength,
}

/// Collects results from a single problem to compare them.
#[derive(Clone, Debug)]
pub struct Comparator<St>
where
    St: State,
{
    results: Vec<SearchResult<St>>,
}

impl<St> Comparator<St>
where
    St: State,
{
    pub fn new() -> Self {
        Self { results: vec![] }
    }

    pub fn add(&mut self, result: SearchResult<St>) {
        self.results.push(result);
    }
    pub fn results(&self) -> &[SearchResult<St>] {
        &self.results
    }
    pub fn records(&self) -> Vec<ResultRecord> {
        self.results.iter().map(SearchResult::record).collect()
    }
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// The best result that found a path. The earliest one wins ties.
    pub fn best_by(&self, metric: Metric) -> Option<&SearchResult<St>> {
        let found = self.results.iter().filter(|r| r.path_found());
        match metric {
            Metric::ExecutionTime => found.min_by_key(|r| r.elapsed),
            Metric::NodesExplored => found.min_by_key(|r| r.nodes_explored),
            Metric::PathLength => found.min_by_key(|r| r.path_length()),
        }
    }
}

impl<St: State> Default for Comparator<St> {
    fn default() -> Self {
        Self::new()
    }
}

impl<St: State> FromIterator<SearchResult<St>> for Comparator<St> {
    fn from_iter<I: IntoIterator<Item = SearchResult<St>>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<St> std::fmt::Display for Comparator<St>
where
    St: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{:<32} {:>10} {:>6} {:>11} {:>11} {:>9} {:>8} {:>18} {:>11}",
            "Algorithm",
            "Nodes",
            "Path",
            "Time (ms)",
            "Memory (KB)",
            "Frontier",
            "Optimal",
            "Time",
            "Space"
        )?;
        writeln!(f, "{}", "-".repeat(132))?;
        for r in &self.results {
            let path = match r.path_found() {
                true => r.path_length().to_string(),
                false => "-".to_string(),
            };
            writeln!(
                f,
                "{:<32} {:>10} {:>6} {:>11.3} {:>11.2} {:>9} {:>8} {:>18} {:>11}",
                r.algorithm.name(),
                r.nodes_explored.separate_with_commas(),
                path,
                r.elapsed_ms(),
                r.memory_kb(),
                r.max_frontier_size.separate_with_commas(),
                if r.is_optimal() { "yes" } else { "no" },
                r.algorithm.time_complexity(),
                r.algorithm.space_complexity(),
            )?;
        }
        Ok(())
    }
}

/// Running totals of one algorithm over many problems.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgorithmStats {
    pub runs: usize,
    pub solved: usize,
    pub total_nodes: usize,
    pub total_time: Duration,
    /// Summed over solved runs only.
    pub total_path_length: usize,
    /// Solved runs whose path was as short as the best one found.
    pub shortest: usize,
}

impl AlgorithmStats {
    pub fn mean_nodes(&self) -> f64 {
        ratio(self.total_nodes, self.runs)
    }
    pub fn mean_time_ms(&self) -> f64 {
        match self.runs {
            0 => 0.0,
            n => self.total_time.as_secs_f64() * 1000.0 / n as f64,
        }
    }
    pub fn mean_path_length(&self) -> f64 {
        ratio(self.total_path_length, self.solved)
    }
}

fn ratio(a: usize, b: usize) -> f64 {
    match b {
        0 => 0.0,
        b => a as f64 / b as f64,
    }
}

/// Aggregates results of many problems by algorithm.
#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    /// Stats in order of first appearance.
    stats: Vec<(Algorithm, AlgorithmStats)>,
    problems: usize,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the results of every algorithm run on a single problem.
    pub fn add_problem<St: State>(&mut self, results: &[SearchResult<St>]) {
        self.problems += 1;
        let shortest = results
            .iter()
            .filter(|r| r.path_found())
            .map(SearchResult::path_length)
            .min();

        for r in results {
            let i = match self.stats.iter().position(|(a, _)| *a == r.algorithm) {
                Some(i) => i,
                None => {
                    self.stats.push((r.algorithm, AlgorithmStats::default()));
                    self.stats.len() - 1
                }
            };
            let stats = &mut self.stats[i].1;
            stats.runs += 1;
            stats.total_nodes += r.nodes_explored;
            stats.total_time += r.elapsed;
            if r.path_found() {
                stats.solved += 1;
                stats.total_path_length += r.path_length();
                if Some(r.path_length()) == shortest {
                    stats.shortest += 1;
                }
            }
        }
    }

    pub fn problems(&self) -> usize {
        self.problems
    }
    pub fn stats(&self) -> &[(Algorithm, AlgorithmStats)] {
        &self.stats
    }
    pub fn get(&self, algorithm: &Algorithm) -> Option<&AlgorithmStats> {
        self.stats
            .iter()
            .find(|(a, _)| a == algorithm)
            .map(|(_, s)| s)
    }
}

impl std::fmt::Display for Dashboard {
    /// An org-mode table.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "| Algorithm | Runs | Solved | Mean nodes | Mean time (ms) | Mean path | Shortest |"
        )?;
        writeln!(f, "|-")?;
        for (a, s) in &self.stats {
            writeln!(
                f,
                "| {} | {} | {} | {:.1} | {:.3} | {:.1} | {} |",
                a,
                s.runs.separate_with_commas(),
                s.solved.separate_with_commas(),
                s.mean_nodes(),
                s.mean_time_ms(),
                s.mean_path_length(),
                s.shortest.separate_with_commas(),
            )?;
        }
        Ok(())
    }
}
