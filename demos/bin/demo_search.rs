//! Quantum-Walk Search Demo
//!
//! Runs spatial search for a marked vertex of K16 with a classical absorbing
//! walk, a Szegedy walk and a continuous-time walk, and logs the best runtime
//! each one finds. Set `RUST_LOG=debug` for operator construction details.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qwalk_demos::runners::SearchRunner;

const VERTICES: usize = 16;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let outcomes = SearchRunner::new(VERTICES).run()?;
    info!(searches = outcomes.len(), "demo complete");

    Ok(())
}
