//! Circuit topology and configuration types.
//!
//! The configuration is owned by the host UI and handed to the core as a
//! read-only snapshot on every evaluation. Validation lives here so the
//! physics evaluator is never asked to divide by zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CircuitLabError;

/// The circuit's branch arrangement. Immutable per simulation session;
/// selected by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitTopology {
    /// Two lamps in series with the battery.
    Series,
    /// Two lamps in independent branches.
    Parallel,
    /// One resistor charging a capacitor (RC transient).
    RcDelay,
}

impl CircuitTopology {
    pub const ALL: [CircuitTopology; 3] = [
        CircuitTopology::Series,
        CircuitTopology::Parallel,
        CircuitTopology::RcDelay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitTopology::Series => "series",
            CircuitTopology::Parallel => "parallel",
            CircuitTopology::RcDelay => "rc-delay",
        }
    }

    /// One-line description for listings (CLI `topologies` command).
    pub fn description(&self) -> &'static str {
        match self {
            CircuitTopology::Series => "Two lamps in series: I = V / (R1 + R2)",
            CircuitTopology::Parallel => "Two lamps in parallel: I = V/R1 + V/R2",
            CircuitTopology::RcDelay => {
                "Resistor charging a capacitor: I = (V/R) * exp(-t / RC)"
            }
        }
    }
}

impl fmt::Display for CircuitTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CircuitTopology {
    type Err = CircuitLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(CircuitTopology::Series),
            "parallel" => Ok(CircuitTopology::Parallel),
            "rc-delay" | "rc" => Ok(CircuitTopology::RcDelay),
            other => Err(CircuitLabError::InvalidConfiguration(format!(
                "Unknown topology: {} (expected series, parallel, or rc-delay)",
                other
            ))),
        }
    }
}

/// Display components addressable by the brightness map and the diagram.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ComponentId {
    Lamp1,
    Lamp2,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Lamp1 => write!(f, "L1"),
            ComponentId::Lamp2 => write!(f, "L2"),
        }
    }
}

/// Electrical configuration snapshot supplied by the host on every
/// evaluation. The core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Whether the circuit switch is closed (current can flow).
    pub switch_closed: bool,
    /// Battery voltage in volts.
    pub voltage: f64,
    /// First resistance in ohms (the only resistance used by rc-delay).
    pub resistance1: f64,
    /// Second resistance in ohms.
    pub resistance2: f64,
    /// Capacitance in microfarads; only meaningful under rc-delay.
    pub capacitance_uf: f64,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            switch_closed: false,
            voltage: 9.0,
            resistance1: 100.0,
            resistance2: 200.0,
            capacitance_uf: 100.0,
        }
    }
}

impl CircuitConfig {
    pub fn new(voltage: f64, resistance1: f64, resistance2: f64) -> Self {
        Self {
            voltage,
            resistance1,
            resistance2,
            ..Self::default()
        }
    }

    pub fn with_switch_closed(mut self, closed: bool) -> Self {
        self.switch_closed = closed;
        self
    }

    pub fn with_capacitance_uf(mut self, capacitance_uf: f64) -> Self {
        self.capacitance_uf = capacitance_uf;
        self
    }

    /// Validate the snapshot before evaluation.
    ///
    /// Resistances and capacitance must be strictly positive; voltage must
    /// be non-negative; every field must be finite.
    pub fn validate(&self) -> Result<(), CircuitLabError> {
        ensure_finite("voltage", self.voltage)?;
        ensure_finite("resistance1", self.resistance1)?;
        ensure_finite("resistance2", self.resistance2)?;
        ensure_finite("capacitance", self.capacitance_uf)?;

        if self.voltage < 0.0 {
            return Err(CircuitLabError::InvalidConfiguration(format!(
                "voltage must be >= 0 V (got {})",
                self.voltage
            )));
        }
        if self.resistance1 <= 0.0 {
            return Err(CircuitLabError::InvalidConfiguration(format!(
                "resistance1 must be > 0 ohms (got {})",
                self.resistance1
            )));
        }
        if self.resistance2 <= 0.0 {
            return Err(CircuitLabError::InvalidConfiguration(format!(
                "resistance2 must be > 0 ohms (got {})",
                self.resistance2
            )));
        }
        if self.capacitance_uf <= 0.0 {
            return Err(CircuitLabError::InvalidConfiguration(format!(
                "capacitance must be > 0 uF (got {})",
                self.capacitance_uf
            )));
        }
        Ok(())
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), CircuitLabError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CircuitLabError::InvalidConfiguration(format!(
            "{} must be finite (got {})",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CircuitConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_resistance_rejected() {
        let config = CircuitConfig::new(9.0, 0.0, 200.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resistance1"));

        let config = CircuitConfig::new(9.0, 100.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_voltage_rejected() {
        let config = CircuitConfig::new(-1.0, 100.0, 200.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_voltage_allowed() {
        let config = CircuitConfig::new(0.0, 100.0, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let config = CircuitConfig::new(f64::NAN, 100.0, 200.0);
        assert!(config.validate().is_err());

        let config = CircuitConfig::new(9.0, f64::INFINITY, 200.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacitance_rejected() {
        let config = CircuitConfig::new(9.0, 100.0, 200.0).with_capacitance_uf(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_topology_round_trip() {
        for topology in CircuitTopology::ALL {
            let parsed: CircuitTopology = topology.as_str().parse().unwrap();
            assert_eq!(parsed, topology);
        }
        assert!("star".parse::<CircuitTopology>().is_err());
    }

    #[test]
    fn test_topology_serde_kebab_case() {
        let json = serde_json::to_string(&CircuitTopology::RcDelay).unwrap();
        assert_eq!(json, "\"rc-delay\"");
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = CircuitConfig::new(5.0, 10.0, 20.0).with_switch_closed(true);
        let json = serde_json::to_string(&config).unwrap();
        let back: CircuitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
