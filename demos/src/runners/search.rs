//! Complete-graph search across every walk model.

use anyhow::Result;
use tracing::{debug, info};

use qwalk::graph::complete_graph;
use qwalk::{
    Ctqw, CtqwMatrix, Dynamics, EngineConfig, MarkedSet, MaximizeMode, QwSearch, Runtime,
    SearchModel, SearchObjective, StochasticWalk, Szegedy, maximize_search,
};

/// Best runtime found by one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Walk model name.
    pub walk: &'static str,
    pub mode: MaximizeMode,
    pub objective: SearchObjective,
    pub runtime: Runtime,
    /// Total probability on the marked vertices at `runtime`.
    pub probability: f64,
}

/// Runs the demo searches on a complete graph.
#[derive(Debug, Clone)]
pub struct SearchRunner {
    vertices: usize,
    max_steps: usize,
    max_time: f64,
    penalty: f64,
}

impl SearchRunner {
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices,
            max_steps: 20,
            max_time: 10.0,
            penalty: 5.0,
        }
    }

    /// Set the step bound for discrete walks.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the time bound for continuous walks.
    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    /// Set the runtime penalty of the final efficiency search.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Probability searches for vertex 0 with every model, then an efficiency
    /// search for two marked vertices on the continuous walk.
    pub fn run(&self) -> Result<Vec<SearchOutcome>> {
        let n = self.vertices;
        let config = EngineConfig::default().with_objective(SearchObjective::Probability);
        debug!(config = %serde_json::to_string(&config)?, "engine configuration");

        let marked = MarkedSet::new([0], n)?;
        info!(vertices = n, marked = ?marked.vertices(), "complete graph search");

        let steps = Runtime::Steps(self.max_steps);
        let time = Runtime::Time(self.max_time);
        let mut outcomes = Vec::with_capacity(5);

        let walk = StochasticWalk::new(complete_graph(n))?;
        let search = QwSearch::with_config(walk, marked.clone(), 0.0, config)?;
        outcomes.push(best_runtime(&search, steps, MaximizeMode::Exact)?);

        let szegedy = Szegedy::new(complete_graph(n))?;
        let search = QwSearch::with_config(szegedy, marked.clone(), 0.0, config)?;
        outcomes.push(best_runtime(&search, steps, MaximizeMode::Exact)?);

        let ctqw = Ctqw::new(complete_graph(n), CtqwMatrix::Adjacency);
        let search = QwSearch::with_config(ctqw, marked, 0.0, config)?;
        outcomes.push(best_runtime(&search, time, MaximizeMode::Exact)?);
        outcomes.push(best_runtime(&search, time, MaximizeMode::Heuristic)?);

        // A runtime penalty under the efficiency objective favours earlier peaks.
        let config = config.with_objective(SearchObjective::Efficiency);
        let search = search.with_marked(MarkedSet::new([3, 7], n)?)?;
        let search = QwSearch::with_parameters(
            search.model().clone(),
            search.parameters().clone(),
            search.marked().clone(),
            self.penalty,
            config,
        )?;
        outcomes.push(best_runtime(&search, time, MaximizeMode::Exact)?);

        Ok(outcomes)
    }
}

fn best_runtime<M: SearchModel>(
    search: &QwSearch<M>,
    bound: Runtime,
    mode: MaximizeMode,
) -> Result<SearchOutcome> {
    let initial = search.initial_state();
    let result = maximize_search(search, &initial, bound, mode)?;
    info!(
        walk = M::NAME,
        ?mode,
        runtime = %result.runtime(),
        probability = result.total_probability(),
        "best runtime"
    );
    Ok(SearchOutcome {
        walk: M::NAME,
        mode,
        objective: search.config().search.objective,
        runtime: result.runtime(),
        probability: result.total_probability(),
    })
}
