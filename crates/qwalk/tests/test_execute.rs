//! Tests for the execution entry points across model families.

use ndarray::Array1;
use num_complex::Complex64;
use qwalk::graph::{complete_graph, cycle_graph, path_graph};
use qwalk::{
    ConfigurationError, Ctqw, CtqwMatrix, Dynamics, ExecuteOptions, Execution, MarkedSet,
    QwError, QwEvolution, QwSearch, Runtime, StochasticWalk, Szegedy, execute, execute_all,
    execute_all_measured, execute_single, execute_single_measured,
};

fn szegedy_search() -> QwSearch<Szegedy> {
    let model = Szegedy::new(cycle_graph(6)).unwrap();
    QwSearch::new(model, MarkedSet::new([2], 6).unwrap(), 0.0).unwrap()
}

fn ctqw_evolution() -> QwEvolution<Ctqw> {
    QwEvolution::new(Ctqw::new(cycle_graph(6), CtqwMatrix::Adjacency)).unwrap()
}

// ---------------------------------------------------------------------------
// execute_all
// ---------------------------------------------------------------------------

#[test]
fn execute_all_has_one_state_per_step() {
    let search = szegedy_search();
    let initial = search.initial_state();
    let states = execute_all(&search, &initial, 7).unwrap();
    assert_eq!(states.len(), 8);
    assert_eq!(states[0], initial);
}

#[test]
fn execute_all_states_follow_single_steps() {
    let search = szegedy_search();
    let initial = search.initial_state();
    let states = execute_all(&search, &initial, 5).unwrap();
    for k in 0..5 {
        assert_eq!(states[k + 1], search.step(&states[k]).unwrap());
    }
    let last = execute_single(&search, &initial, 5usize).unwrap();
    assert_eq!(states[5], last);
}

#[test]
fn execute_all_zero_steps_is_initial_state() {
    let evolution = QwEvolution::new(StochasticWalk::new(path_graph(4)).unwrap()).unwrap();
    let initial = evolution.initial_state();
    let states = execute_all(&evolution, &initial, 0).unwrap();
    assert_eq!(states, vec![initial]);
}

#[test]
fn execute_all_measured_rows_match_states() {
    let search = szegedy_search();
    let initial = search.initial_state();
    let states = execute_all(&search, &initial, 4).unwrap();
    let measured = execute_all_measured(&search, &initial, 4).unwrap();
    assert_eq!(measured.dim(), (5, 6));
    for (row, state) in measured.rows().into_iter().zip(&states) {
        assert_eq!(row.to_owned(), search.measure(state, None).unwrap());
    }
}

#[test]
fn execute_all_unsupported_for_continuous_walk() {
    let evolution = ctqw_evolution();
    let initial = evolution.initial_state();
    let err = execute_all(&evolution, &initial, 3).unwrap_err();
    assert!(matches!(err, QwError::UnsupportedOperation { .. }));
    let err = execute_all_measured(&evolution, &initial, 3).unwrap_err();
    assert!(err.is_unsupported());
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

#[test]
fn measure_on_full_vertex_set_equals_full_distribution() {
    let search = szegedy_search();
    let state = execute_single(&search, &search.initial_state(), 3usize).unwrap();
    let all: Vec<usize> = (0..6).collect();
    assert_eq!(
        search.measure(&state, Some(all.as_slice())).unwrap(),
        search.measure(&state, None).unwrap()
    );

    let evolution = ctqw_evolution();
    let state = execute_single(&evolution, &evolution.initial_state(), 1.3).unwrap();
    assert_eq!(
        evolution.measure(&state, Some(all.as_slice())).unwrap(),
        evolution.measure(&state, None).unwrap()
    );
}

#[test]
fn measure_subset_follows_subset_order() {
    let evolution = QwEvolution::new(StochasticWalk::new(path_graph(3)).unwrap()).unwrap();
    let state = Array1::from(vec![0.5, 0.3, 0.2]);
    let p = evolution.measure(&state, Some(&[2, 0][..])).unwrap();
    assert_eq!(p.to_vec(), vec![0.2, 0.5]);
}

#[test]
fn measure_does_not_mutate_state() {
    let search = szegedy_search();
    let state = execute_single(&search, &search.initial_state(), 2usize).unwrap();
    let copy = state.clone();
    let _ = search.measure(&state, None).unwrap();
    assert_eq!(state, copy);
}

#[test]
fn measure_out_of_range_vertex_rejected() {
    let evolution = ctqw_evolution();
    let err = evolution
        .measure(&evolution.initial_state(), Some(&[6][..]))
        .unwrap_err();
    assert!(matches!(
        err,
        QwError::Configuration(ConfigurationError::VertexOutOfRange { vertex: 6, .. })
    ));
}

// ---------------------------------------------------------------------------
// Classical walk
// ---------------------------------------------------------------------------

#[test]
fn uniform_walk_on_complete_graph_converges_to_uniform() {
    let evolution = QwEvolution::new(StochasticWalk::new(complete_graph(5)).unwrap()).unwrap();
    let mut initial = Array1::zeros(5);
    initial[0] = 1.0;
    let p = execute_single_measured(&evolution, &initial, 200usize).unwrap();
    for value in p {
        assert!((value - 0.2).abs() < 1e-12);
    }
}

#[test]
fn absorbing_search_accumulates_probability() {
    let model = StochasticWalk::new(cycle_graph(8)).unwrap();
    let search = QwSearch::new(model, MarkedSet::new([0], 8).unwrap(), 0.0).unwrap();
    let initial = search.initial_state();
    let states = execute_all(&search, &initial, 30).unwrap();
    let marked: Vec<f64> = states
        .iter()
        .map(|s| search.measure_marked(s).unwrap()[0])
        .collect();
    for pair in marked.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-15);
    }
    let total: f64 = states[30].sum();
    assert!((total - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// execute dispatch
// ---------------------------------------------------------------------------

#[test]
fn execute_without_flags_is_ambiguous() {
    let search = szegedy_search();
    let err = execute(&search, &search.initial_state(), 2usize, ExecuteOptions::new())
        .unwrap_err();
    assert!(matches!(
        err,
        QwError::Configuration(ConfigurationError::AmbiguousExecution)
    ));
}

#[test]
fn execute_dispatches_all_four_variants() {
    let search = szegedy_search();
    let initial = search.initial_state();

    let single = execute(&search, &initial, 3usize, ExecuteOptions::new().measured(false))
        .unwrap();
    assert_eq!(
        single,
        Execution::State(execute_single(&search, &initial, 3usize).unwrap())
    );

    let measured = execute(&search, &initial, 3usize, ExecuteOptions::new().measured(true))
        .unwrap();
    assert_eq!(
        measured,
        Execution::Measured(execute_single_measured(&search, &initial, 3usize).unwrap())
    );

    let all = execute(&search, &initial, 3usize, ExecuteOptions::new().all(true)).unwrap();
    assert_eq!(
        all,
        Execution::States(execute_all(&search, &initial, 3).unwrap())
    );

    let all_measured = execute(
        &search,
        &initial,
        3usize,
        ExecuteOptions::new().measured(true).all(true),
    )
    .unwrap();
    assert_eq!(
        all_measured,
        Execution::MeasuredAll(execute_all_measured(&search, &initial, 3).unwrap())
    );
}

#[test]
fn execute_all_with_real_time_unsupported() {
    let evolution = ctqw_evolution();
    let err = execute(
        &evolution,
        &evolution.initial_state(),
        2.5,
        ExecuteOptions::new().all(true),
    )
    .unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn continuous_walk_reads_steps_as_time() {
    let evolution = ctqw_evolution();
    let initial = evolution.initial_state();
    let from_steps = execute_single(&evolution, &initial, Runtime::Steps(2)).unwrap();
    let from_time = execute_single(&evolution, &initial, Runtime::Time(2.0)).unwrap();
    assert_eq!(from_steps, from_time);
}

#[test]
fn continuous_state_has_complex_entries() {
    let evolution = ctqw_evolution();
    let mut initial = Array1::from_elem(6, Complex64::new(0.0, 0.0));
    initial[0] = Complex64::new(1.0, 0.0);
    let state = execute_single(&evolution, &initial, 0.4).unwrap();
    assert!(state.iter().any(|a| a.im.abs() > 1e-6));
}
