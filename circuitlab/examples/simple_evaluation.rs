//! Simple evaluation example: compute the RC charging curve and print it.

use circuitlab::prelude::*;

fn main() -> Result<(), CircuitLabError> {
    let config = CircuitConfig::new(10.0, 1000.0, 200.0)
        .with_capacitance_uf(100.0)
        .with_switch_closed(true);

    let sim = CircuitSimulation::new(CircuitTopology::RcDelay, config)?;

    println!("RC charging (V=10, R=1k, C=100uF, tau=0.1s)");
    println!("{:>8} {:>12} {:>12}", "t (s)", "I (A)", "Vc (V)");

    for step in 0..=10 {
        let t = step as f64 * 0.05;
        let state = sim.state_at(t)?;
        println!(
            "{:>8.2} {:>12.6} {:>12.3}",
            t,
            state.total_current,
            state.capacitor_voltage.unwrap_or(0.0)
        );
    }

    Ok(())
}
