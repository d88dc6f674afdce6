//! Core simulation API shared by hosts and the CLI.
//! No rendering or UI framework dependencies.

use crate::config::{CircuitConfig, CircuitTopology};
use crate::diagram::{RenderFrame, SchematicLayout};
use crate::physics::{self, DerivedElectricalState};

#[derive(Debug, thiserror::Error)]
pub enum CircuitLabError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Non-finite result: {0}")]
    NonFinite(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CircuitLabError {
    fn from(e: serde_json::Error) -> Self {
        CircuitLabError::InvalidConfiguration(e.to_string())
    }
}

/// One simulation session: a topology fixed at construction, the latest
/// host-supplied configuration snapshot, and the topology's schematic
/// layout.
///
/// The host owns the configuration and the elapsed-time clock; this type
/// only validates snapshots and composes the evaluator with the diagram
/// contract. All methods are synchronous pure computation, safe to call on
/// every render tick.
pub struct CircuitSimulation {
    topology: CircuitTopology,
    config: CircuitConfig,
    layout: SchematicLayout,
}

impl CircuitSimulation {
    /// Create a session, validating the initial configuration.
    pub fn new(
        topology: CircuitTopology,
        config: CircuitConfig,
    ) -> Result<Self, CircuitLabError> {
        config.validate()?;
        tracing::debug!(topology = %topology, "starting circuit simulation session");
        Ok(Self {
            topology,
            config,
            layout: SchematicLayout::for_topology(topology),
        })
    }

    pub fn topology(&self) -> CircuitTopology {
        self.topology
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn layout(&self) -> &SchematicLayout {
        &self.layout
    }

    /// Replace the configuration with a new host snapshot.
    pub fn set_config(&mut self, config: CircuitConfig) -> Result<(), CircuitLabError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Derived electrical state at `elapsed_seconds` since the switch last
    /// closed.
    pub fn state_at(
        &self,
        elapsed_seconds: f64,
    ) -> Result<DerivedElectricalState, CircuitLabError> {
        physics::evaluate(self.topology, &self.config, elapsed_seconds)
    }

    /// Full render frame: evaluated state composed with the diagram
    /// contract at the given animation phase offset.
    pub fn frame_at(
        &self,
        elapsed_seconds: f64,
        phase_offset: f64,
    ) -> Result<RenderFrame, CircuitLabError> {
        let state = self.state_at(elapsed_seconds)?;
        Ok(self
            .layout
            .render_frame(&state, self.config.switch_closed, phase_offset))
    }
}
