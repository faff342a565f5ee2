//! Tests for engine configuration.

use qwalk::linalg::{EigenConfig, KrylovConfig};
use qwalk::{ConfigurationError, EngineConfig, QwError, SearchConfig, SearchObjective};

fn assert_invalid(config: EngineConfig) {
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        QwError::Configuration(ConfigurationError::InvalidConfig(_))
    ));
}

#[test]
fn default_config_is_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.search.objective, SearchObjective::Efficiency);
    assert_eq!(config, EngineConfig::new());
}

#[test]
fn config_json_roundtrip() {
    let config = EngineConfig::default()
        .with_objective(SearchObjective::Probability)
        .with_stochastic_tolerance(1e-8);
    let json = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "search": { "objective": "probability", "grid_points": 40 } }"#;
    let config: EngineConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.search.objective, SearchObjective::Probability);
    assert_eq!(config.search.grid_points, 40);
    assert_eq!(
        config.search.golden_tolerance,
        SearchConfig::default().golden_tolerance
    );
    assert_eq!(config.krylov, KrylovConfig::default());
    assert_eq!(config.symmetry_tolerance, 1e-10);
}

#[test]
fn builders_replace_sections() {
    let eigen = EigenConfig {
        max_iterations: 50,
        tolerance: 1e-6,
    };
    let search = SearchConfig {
        grid_points: 10,
        ..SearchConfig::default()
    };
    let config = EngineConfig::new().with_eigen(eigen).with_search(search);
    assert_eq!(config.eigen, eigen);
    assert_eq!(config.search.grid_points, 10);
}

#[test]
fn out_of_range_values_rejected() {
    assert_invalid(EngineConfig::default().with_eigen(EigenConfig {
        max_iterations: 0,
        ..EigenConfig::default()
    }));
    assert_invalid(EngineConfig::default().with_eigen(EigenConfig {
        tolerance: 0.0,
        ..EigenConfig::default()
    }));
    assert_invalid(EngineConfig::default().with_krylov(KrylovConfig {
        dimension: 0,
        ..KrylovConfig::default()
    }));
    assert_invalid(EngineConfig::default().with_search(SearchConfig {
        grid_points: 0,
        ..SearchConfig::default()
    }));
    assert_invalid(EngineConfig::default().with_search(SearchConfig {
        golden_tolerance: f64::NAN,
        ..SearchConfig::default()
    }));
    assert_invalid(EngineConfig::default().with_stochastic_tolerance(-1.0));
}
