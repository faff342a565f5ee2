//! Search-time maximisation.
//!
//! [`maximize_search`] looks for the runtime in `(0, max]` with the best
//! objective for a [`QwSearch`]. Exact mode simulates: every step of a
//! discrete walk, or a parallel time grid refined by golden-section search
//! for a continuous one. Heuristic mode models the marked probability as
//! `sin²(ε·t)`, with `ε` the overlap of the initial state with the marked
//! subspace, and evaluates only the model's optimum. That model holds for
//! complete-graph-like instances; exact mode is the default.

use std::f64::consts::FRAC_PI_2;

use ndarray::Array1;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::SearchObjective;
use crate::dynamics::{Dynamics, QwSearch, Runtime};
use crate::error::{ConfigurationError, QwError, QwResult};
use crate::model::{SearchModel, TimeModel, check_state_len};

const BISECTION_ITERATIONS: usize = 100;

/// Best state found by [`maximize_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<A> {
    state: Array1<A>,
    probability: Array1<f64>,
    runtime: Runtime,
}

impl<A> SearchResult<A> {
    /// Assemble a result.
    pub fn new(state: Array1<A>, probability: Array1<f64>, runtime: Runtime) -> Self {
        Self {
            state,
            probability,
            runtime,
        }
    }

    /// Terminal state.
    pub fn state(&self) -> &Array1<A> {
        &self.state
    }

    /// Probability of each marked vertex, in marked-set order.
    pub fn probability(&self) -> &Array1<f64> {
        &self.probability
    }

    /// Runtime that produced the state.
    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Probability of measuring any marked vertex.
    pub fn total_probability(&self) -> f64 {
        self.probability.sum()
    }
}

/// How [`maximize_search`] explores runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaximizeMode {
    /// Simulate candidate runtimes.
    #[default]
    Exact,
    /// Evaluate the optimum of the sinusoidal model (continuous models only).
    Heuristic,
}

/// Objective value of a candidate.
pub fn objective_value(
    probability: f64,
    runtime: f64,
    penalty: f64,
    objective: SearchObjective,
) -> f64 {
    match objective {
        SearchObjective::Efficiency => probability / (runtime + penalty),
        SearchObjective::Probability => probability,
    }
}

/// Find the runtime in `(0, max_runtime]` that maximises the configured
/// objective. Ties go to the earliest runtime.
#[instrument(skip(search, initial), fields(model = M::NAME, marked = search.marked().len()))]
pub fn maximize_search<M: SearchModel>(
    search: &QwSearch<M>,
    initial: &Array1<M::Amplitude>,
    max_runtime: Runtime,
    mode: MaximizeMode,
) -> QwResult<SearchResult<M::Amplitude>> {
    if !max_runtime.is_positive() {
        return Err(ConfigurationError::NonPositiveRuntime(max_runtime.as_time()).into());
    }
    check_state_len(initial.len(), search.state_dimension())?;

    let result = match (M::TIME_MODEL, mode) {
        (TimeModel::Discrete, MaximizeMode::Exact) => {
            exact_discrete(search, initial, max_runtime)?
        }
        (TimeModel::Discrete, MaximizeMode::Heuristic) => {
            return Err(QwError::unsupported("heuristic search maximisation", M::NAME));
        }
        (TimeModel::Continuous, MaximizeMode::Exact) => {
            exact_continuous(search, initial, max_runtime.as_time())?
        }
        (TimeModel::Continuous, MaximizeMode::Heuristic) => {
            heuristic(search, initial, max_runtime.as_time())?
        }
    };

    info!(
        runtime = %result.runtime,
        probability = result.total_probability(),
        "search maximised"
    );
    Ok(result)
}

fn score<M: SearchModel>(search: &QwSearch<M>, probability: f64, runtime: f64) -> f64 {
    objective_value(
        probability,
        runtime,
        search.penalty(),
        search.config().search.objective,
    )
}

fn exact_discrete<M: SearchModel>(
    search: &QwSearch<M>,
    initial: &Array1<M::Amplitude>,
    max_runtime: Runtime,
) -> QwResult<SearchResult<M::Amplitude>> {
    let Runtime::Steps(max_steps) = max_runtime else {
        return Err(QwError::unsupported(
            "search maximisation over a real-valued time",
            M::NAME,
        ));
    };

    let mut state = initial.clone();
    let mut best: Option<(f64, SearchResult<M::Amplitude>)> = None;
    for step in 1..=max_steps {
        state = search.step(&state)?;
        let probability = search.measure_marked(&state)?;
        let value = score(search, probability.sum(), step as f64);
        if best.as_ref().is_none_or(|(best_value, _)| value > *best_value) {
            let candidate = SearchResult::new(state.clone(), probability, Runtime::Steps(step));
            best = Some((value, candidate));
        }
    }
    best.map(|(_, result)| result)
        .ok_or_else(|| ConfigurationError::NonPositiveRuntime(0.0).into())
}

fn evaluate<M: SearchModel>(
    search: &QwSearch<M>,
    initial: &Array1<M::Amplitude>,
    time: f64,
) -> QwResult<SearchResult<M::Amplitude>> {
    let state = search.evolve_to(initial, time)?;
    let probability = search.measure_marked(&state)?;
    Ok(SearchResult::new(state, probability, Runtime::Time(time)))
}

fn exact_continuous<M: SearchModel>(
    search: &QwSearch<M>,
    initial: &Array1<M::Amplitude>,
    max_time: f64,
) -> QwResult<SearchResult<M::Amplitude>> {
    let settings = search.config().search;
    let points = settings.grid_points;
    let times: Vec<f64> = (1..=points)
        .map(|k| max_time * k as f64 / points as f64)
        .collect();

    let values = times
        .par_iter()
        .map(|&t| -> QwResult<f64> {
            let probability = search.measure_marked(&search.evolve_to(initial, t)?)?.sum();
            Ok(score(search, probability, t))
        })
        .collect::<QwResult<Vec<f64>>>()?;

    let mut best_index = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best_index] {
            best_index = index;
        }
    }
    let lower = if best_index == 0 { 0.0 } else { times[best_index - 1] };
    let upper = times.get(best_index + 1).copied().unwrap_or(max_time);
    debug!(
        grid_time = times[best_index],
        grid_value = values[best_index],
        lower,
        upper,
        "refining grid maximum"
    );

    let refined_time = golden_section_max(
        |t| {
            let probability = search.measure_marked(&search.evolve_to(initial, t)?)?.sum();
            Ok(score(search, probability, t))
        },
        lower,
        upper,
        settings.golden_tolerance,
        settings.golden_max_iterations,
    )?;

    let grid = evaluate(search, initial, times[best_index])?;
    let refined = evaluate(search, initial, refined_time)?;
    let grid_value = score(search, grid.total_probability(), times[best_index]);
    let refined_value = score(search, refined.total_probability(), refined_time);
    Ok(if refined_value > grid_value { refined } else { grid })
}

/// Golden-section search for a maximum of `f` on `[lower, upper]`; returns
/// the best interior point visited last.
fn golden_section_max(
    f: impl Fn(f64) -> QwResult<f64>,
    mut lower: f64,
    mut upper: f64,
    tolerance: f64,
    max_iterations: usize,
) -> QwResult<f64> {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut left = upper - ratio * (upper - lower);
    let mut right = lower + ratio * (upper - lower);
    let mut f_left = f(left)?;
    let mut f_right = f(right)?;
    for _ in 0..max_iterations {
        if upper - lower <= tolerance {
            break;
        }
        if f_left >= f_right {
            upper = right;
            right = left;
            f_right = f_left;
            left = upper - ratio * (upper - lower);
            f_left = f(left)?;
        } else {
            lower = left;
            left = right;
            f_left = f_right;
            right = lower + ratio * (upper - lower);
            f_right = f(right)?;
        }
    }
    Ok(if f_left >= f_right { left } else { right })
}

/// Smallest positive root of `2·(x + c)·cos x = sin x`, the maximiser of
/// `sin²x / (x + c)` on `(0, π/2)`.
fn efficiency_peak(c: f64) -> f64 {
    let g = |x: f64| 2.0 * (x + c) * x.cos() - x.sin();
    let (mut lower, mut upper) = (1e-9, FRAC_PI_2);
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lower + upper);
        if g(mid) > 0.0 {
            lower = mid;
        } else {
            upper = mid;
        }
    }
    0.5 * (lower + upper)
}

fn heuristic<M: SearchModel>(
    search: &QwSearch<M>,
    initial: &Array1<M::Amplitude>,
    max_time: f64,
) -> QwResult<SearchResult<M::Amplitude>> {
    let overlap = search.measure_marked(initial)?.sum();
    let epsilon = overlap.sqrt();
    if !(epsilon > 0.0) {
        return Err(QwError::unsupported(
            "heuristic search from a state with no marked amplitude",
            M::NAME,
        ));
    }
    let angle = match search.config().search.objective {
        SearchObjective::Probability => FRAC_PI_2,
        SearchObjective::Efficiency => efficiency_peak(epsilon * search.penalty()),
    };
    let time = (angle / epsilon).min(max_time);
    debug!(epsilon, angle, time, "heuristic search time");
    evaluate(search, initial, time)
}
