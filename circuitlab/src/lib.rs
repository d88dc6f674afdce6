//! CircuitLab - closed-form DC circuit physics and animation engine
//!
//! This library powers an interactive circuit-teaching visualizer: it
//! evaluates simple DC topologies (series, parallel, RC charging) in
//! closed form and drives a charge-flow animation phase, leaving all
//! drawing to a host rendering layer.
//!
//! # Quick Start
//!
//! ```
//! use circuitlab::{evaluate, CircuitConfig, CircuitTopology};
//!
//! let config = CircuitConfig::new(9.0, 100.0, 200.0).with_switch_closed(true);
//! let state = evaluate(CircuitTopology::Series, &config, 0.0).unwrap();
//!
//! assert_eq!(state.total_current, 0.03);
//! ```
//!
//! # Features
//!
//! - **Physics evaluator**: pure, deterministic, recomputed per render tick
//! - **Animation driver**: cancellable per-frame task advancing a dash phase
//! - **Diagram contract**: petgraph schematic layouts and per-frame render
//!   parameters for the host renderer

pub mod animation;
pub mod config;
pub mod core;
pub mod diagram;
pub mod physics;

// Re-export main types
pub use crate::core::{CircuitLabError, CircuitSimulation};
pub use animation::{AnimationDriver, FrameInput};
pub use config::{CircuitConfig, CircuitTopology, ComponentId};
pub use diagram::{RenderFrame, SchematicLayout};
pub use physics::DerivedElectricalState;

/// Load a configuration snapshot from a JSON file (convenience wrapper).
pub fn load_config(path: &std::path::Path) -> Result<CircuitConfig, CircuitLabError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Evaluate a circuit at an instant (convenience wrapper).
pub fn evaluate(
    topology: CircuitTopology,
    config: &CircuitConfig,
    elapsed_seconds: f64,
) -> Result<DerivedElectricalState, CircuitLabError> {
    physics::evaluate(topology, config, elapsed_seconds)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnimationDriver, CircuitConfig, CircuitLabError, CircuitSimulation, CircuitTopology,
        ComponentId, DerivedElectricalState, FrameInput, RenderFrame, SchematicLayout,
    };
}
