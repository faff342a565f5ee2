//! Execution entry points, written once against [`Dynamics`].

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::dynamics::{Dynamics, Runtime};
use crate::error::{ConfigurationError, QwError, QwResult};
use crate::model::check_state_len;

/// Evolve `initial` by `runtime` and return the terminal state.
pub fn execute_single<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: &Array1<D::Amplitude>,
    runtime: impl Into<Runtime>,
) -> QwResult<Array1<D::Amplitude>> {
    dynamics.evolve(initial, runtime.into())
}

/// Evolve `initial` by `runtime` and measure the terminal state.
pub fn execute_single_measured<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: &Array1<D::Amplitude>,
    runtime: impl Into<Runtime>,
) -> QwResult<Array1<f64>> {
    let state = execute_single(dynamics, initial, runtime)?;
    dynamics.measure(&state, None)
}

/// States after `0, 1, ..., steps` steps; the first is `initial`.
///
/// Only discrete dynamics have a sequence of intermediate states.
pub fn execute_all<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: &Array1<D::Amplitude>,
    steps: usize,
) -> QwResult<Vec<Array1<D::Amplitude>>> {
    if !dynamics.time_model().is_discrete() {
        return Err(QwError::unsupported(
            "execute_all",
            dynamics.model_name(),
        ));
    }
    check_state_len(initial.len(), dynamics.state_dimension())?;
    let mut states = Vec::with_capacity(steps + 1);
    states.push(initial.clone());
    for _ in 0..steps {
        let next = match states.last() {
            Some(previous) => dynamics.step(previous)?,
            None => break,
        };
        states.push(next);
    }
    Ok(states)
}

/// Distributions after `0, 1, ..., steps` steps, one row per step.
pub fn execute_all_measured<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: &Array1<D::Amplitude>,
    steps: usize,
) -> QwResult<Array2<f64>> {
    let states = execute_all(dynamics, initial, steps)?;
    let mut distributions = Array2::zeros((states.len(), dynamics.vertex_count()));
    for (mut row, state) in distributions.rows_mut().into_iter().zip(&states) {
        row.assign(&dynamics.measure(state, None)?);
    }
    Ok(distributions)
}

/// Variant selection for [`execute`].
///
/// At least one flag must be set; an unset flag next to a set one reads as
/// `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Measure the result.
    pub measured: Option<bool>,
    /// Return every intermediate state.
    pub all: Option<bool>,
}

impl ExecuteOptions {
    /// No flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `measured` flag.
    #[must_use]
    pub fn measured(mut self, measured: bool) -> Self {
        self.measured = Some(measured);
        self
    }

    /// Set the `all` flag.
    #[must_use]
    pub fn all(mut self, all: bool) -> Self {
        self.all = Some(all);
        self
    }
}

/// Output of [`execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Execution<A> {
    /// Terminal state.
    State(Array1<A>),
    /// Distribution of the terminal state.
    Measured(Array1<f64>),
    /// Every intermediate state.
    States(Vec<Array1<A>>),
    /// Distribution of every intermediate state, one row per step.
    MeasuredAll(Array2<f64>),
}

/// Dispatch to one of the four execution variants.
pub fn execute<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: &Array1<D::Amplitude>,
    runtime: impl Into<Runtime>,
    options: ExecuteOptions,
) -> QwResult<Execution<D::Amplitude>> {
    if options.measured.is_none() && options.all.is_none() {
        return Err(ConfigurationError::AmbiguousExecution.into());
    }
    let measured = options.measured.unwrap_or(false);
    let all = options.all.unwrap_or(false);
    let runtime = runtime.into();

    if all {
        let Runtime::Steps(steps) = runtime else {
            return Err(QwError::unsupported(
                "execute_all",
                dynamics.model_name(),
            ));
        };
        return if measured {
            execute_all_measured(dynamics, initial, steps).map(Execution::MeasuredAll)
        } else {
            execute_all(dynamics, initial, steps).map(Execution::States)
        };
    }
    if measured {
        execute_single_measured(dynamics, initial, runtime).map(Execution::Measured)
    } else {
        execute_single(dynamics, initial, runtime).map(Execution::State)
    }
}
