//! Animated loop example: run the driver for a second and watch the dash
//! phase advance with the decaying RC current.

use std::time::Duration;

use circuitlab::prelude::*;

#[tokio::main]
async fn main() -> Result<(), CircuitLabError> {
    let config = CircuitConfig::new(10.0, 100.0, 200.0)
        .with_capacitance_uf(2000.0)
        .with_switch_closed(true);
    let sim = CircuitSimulation::new(CircuitTopology::RcDelay, config)?;

    let mut driver = AnimationDriver::new();
    driver.start();

    let start = std::time::Instant::now();
    for _ in 0..10 {
        let elapsed = start.elapsed().as_secs_f64();
        let state = sim.state_at(elapsed)?;
        driver.submit(FrameInput {
            total_current: state.total_current,
            switch_closed: true,
        });

        println!(
            "t={:.2}s  I={:.4}A  phase={:.1}",
            elapsed,
            state.total_current,
            driver.offset()
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    driver.stop();
    Ok(())
}
