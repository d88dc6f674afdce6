//! Closed-form physics evaluator.
//!
//! Pure function mapping `(topology, config, elapsed seconds)` to derived
//! electrical quantities. No caching, no incremental state: every call
//! recomputes from scratch, so replaying the same inputs reproduces
//! identical outputs regardless of animation phase or render cadence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{CircuitConfig, CircuitTopology, ComponentId};
use crate::core::CircuitLabError;

/// Microfarads to farads.
const MICROFARAD: f64 = 1e-6;

/// Series brightness divisor: brightness = (I * R) / 10.
/// Empirical display scaling preserved for renderer compatibility.
const SERIES_BRIGHTNESS_DIVISOR: f64 = 10.0;

/// Parallel brightness divisor: brightness = I_branch / 5.
const PARALLEL_BRIGHTNESS_DIVISOR: f64 = 5.0;

/// RC brightness gain: brightness = I * 5.
const RC_BRIGHTNESS_GAIN: f64 = 5.0;

/// Electrical quantities derived from one evaluation.
///
/// Brightness values are unclamped; clamping to a displayable range is a
/// rendering concern (see [`crate::diagram`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedElectricalState {
    /// Total current through the battery, in amperes.
    pub total_current: f64,
    /// Per-component display brightness, unclamped.
    pub branch_brightness: BTreeMap<ComponentId, f64>,
    /// Capacitor voltage in volts; `Some` only under rc-delay.
    pub capacitor_voltage: Option<f64>,
}

impl DerivedElectricalState {
    /// Brightness for a component, 0 when the component is not present in
    /// the active topology.
    pub fn brightness(&self, component: ComponentId) -> f64 {
        self.branch_brightness.get(&component).copied().unwrap_or(0.0)
    }

    fn open_switch(topology: CircuitTopology) -> Self {
        let mut branch_brightness = BTreeMap::new();
        branch_brightness.insert(ComponentId::Lamp1, 0.0);
        if topology != CircuitTopology::RcDelay {
            branch_brightness.insert(ComponentId::Lamp2, 0.0);
        }
        Self {
            total_current: 0.0,
            branch_brightness,
            // No discharge model: the capacitor reading snaps to zero the
            // instant the switch opens, matching the teaching demo.
            capacitor_voltage: (topology == CircuitTopology::RcDelay).then_some(0.0),
        }
    }
}

/// Evaluate the circuit at an instant.
///
/// `elapsed_seconds` is the time since the switch was last closed; it is
/// only meaningful under rc-delay but must always be finite and >= 0.
///
/// Validation happens here at the boundary. A non-finite output from
/// inputs that slipped past validation is surfaced as an error rather than
/// clamped, since clamping would hide the upstream bug.
pub fn evaluate(
    topology: CircuitTopology,
    config: &CircuitConfig,
    elapsed_seconds: f64,
) -> Result<DerivedElectricalState, CircuitLabError> {
    config.validate()?;
    if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
        return Err(CircuitLabError::InvalidConfiguration(format!(
            "elapsed time must be finite and >= 0 s (got {})",
            elapsed_seconds
        )));
    }

    if !config.switch_closed {
        return Ok(DerivedElectricalState::open_switch(topology));
    }

    let state = match topology {
        CircuitTopology::Series => evaluate_series(config),
        CircuitTopology::Parallel => evaluate_parallel(config),
        CircuitTopology::RcDelay => evaluate_rc_delay(config, elapsed_seconds),
    };
    ensure_finite_state(&state)?;

    tracing::trace!(
        topology = %topology,
        total_current = state.total_current,
        "evaluated circuit state"
    );
    Ok(state)
}

fn evaluate_series(config: &CircuitConfig) -> DerivedElectricalState {
    let equivalent_resistance = config.resistance1 + config.resistance2;
    let current = config.voltage / equivalent_resistance;

    let mut branch_brightness = BTreeMap::new();
    branch_brightness.insert(
        ComponentId::Lamp1,
        (current * config.resistance1) / SERIES_BRIGHTNESS_DIVISOR,
    );
    branch_brightness.insert(
        ComponentId::Lamp2,
        (current * config.resistance2) / SERIES_BRIGHTNESS_DIVISOR,
    );

    DerivedElectricalState {
        total_current: current,
        branch_brightness,
        capacitor_voltage: None,
    }
}

fn evaluate_parallel(config: &CircuitConfig) -> DerivedElectricalState {
    let current1 = config.voltage / config.resistance1;
    let current2 = config.voltage / config.resistance2;

    let mut branch_brightness = BTreeMap::new();
    branch_brightness.insert(ComponentId::Lamp1, current1 / PARALLEL_BRIGHTNESS_DIVISOR);
    branch_brightness.insert(ComponentId::Lamp2, current2 / PARALLEL_BRIGHTNESS_DIVISOR);

    DerivedElectricalState {
        total_current: current1 + current2,
        branch_brightness,
        capacitor_voltage: None,
    }
}

fn evaluate_rc_delay(config: &CircuitConfig, elapsed_seconds: f64) -> DerivedElectricalState {
    let resistance = config.resistance1;
    let capacitance = config.capacitance_uf * MICROFARAD;
    let tau = resistance * capacitance;

    let decay = (-elapsed_seconds / tau).exp();
    let current = (config.voltage / resistance) * decay;
    let capacitor_voltage = config.voltage * (1.0 - decay);

    let mut branch_brightness = BTreeMap::new();
    branch_brightness.insert(ComponentId::Lamp1, current * RC_BRIGHTNESS_GAIN);

    DerivedElectricalState {
        total_current: current,
        branch_brightness,
        capacitor_voltage: Some(capacitor_voltage),
    }
}

fn ensure_finite_state(state: &DerivedElectricalState) -> Result<(), CircuitLabError> {
    let mut values = vec![("total_current", state.total_current)];
    if let Some(vc) = state.capacitor_voltage {
        values.push(("capacitor_voltage", vc));
    }
    for (name, value) in values {
        if !value.is_finite() {
            return Err(CircuitLabError::NonFinite(format!(
                "{} evaluated to {}",
                name, value
            )));
        }
    }
    for (component, brightness) in &state.branch_brightness {
        if !brightness.is_finite() {
            return Err(CircuitLabError::NonFinite(format!(
                "brightness of {} evaluated to {}",
                component, brightness
            )));
        }
    }
    Ok(())
}
