//! Charge-flow animation driver.
//!
//! A single recurring task advances a phase offset once per display frame,
//! proportional to the instantaneous current but capped so the marching
//! dashes stay legible. The phase is the only mutable state in the core
//! and is owned exclusively by the driver; the physics evaluator never
//! reads it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Phase wraps into `[0, PHASE_PERIOD)` to avoid unbounded growth. The
/// reference rendering uses a 1000-unit dash period.
pub const PHASE_PERIOD: f64 = 1000.0;

/// Dash speed per ampere of current.
pub const SPEED_GAIN: f64 = 2.0;

/// Speed cap in phase units per frame; beyond this the motion is
/// visually illegible.
pub const MAX_SPEED: f64 = 10.0;

/// Default display refresh rate assumed by the driver.
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

/// Latest evaluated quantities the driver needs each frame. Submitted by
/// the host after every evaluation; the driver always reads the most
/// recent value, so a config change is reflected within one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub total_current: f64,
    pub switch_closed: bool,
}

/// Per-frame dash speed: proportional to current, capped, and zero the
/// instant the switch opens (even while an rc-delay current is still
/// decaying).
pub fn frame_speed(total_current: f64, switch_closed: bool) -> f64 {
    if switch_closed {
        (total_current * SPEED_GAIN).min(MAX_SPEED)
    } else {
        0.0
    }
}

/// Advance the phase by one frame, wrapping modulo [`PHASE_PERIOD`].
pub fn advance_phase(offset: f64, speed: f64) -> f64 {
    (offset - speed).rem_euclid(PHASE_PERIOD)
}

/// Continuously running visual clock for the charge-flow effect.
///
/// Started when the host mounts the circuit view and stopped when it
/// unmounts. The phase deliberately survives topology and configuration
/// changes so transitions stay visually continuous; only an explicit
/// [`AnimationDriver::reset`] returns it to zero.
pub struct AnimationDriver {
    input_tx: watch::Sender<FrameInput>,
    // Kept alive so submissions made while the task is not running are
    // retained and observed on the first frame after start().
    input_rx: watch::Receiver<FrameInput>,
    phase: Arc<Mutex<f64>>,
    handle: Option<tokio::task::JoinHandle<()>>,
    frame_interval: Duration,
}

impl AnimationDriver {
    /// Create a driver at the default ~60 Hz frame rate. The task is not
    /// running until [`AnimationDriver::start`] is called.
    pub fn new() -> Self {
        Self::with_frame_rate(DEFAULT_FRAME_RATE_HZ)
    }

    pub fn with_frame_rate(frames_per_second: u32) -> Self {
        let (input_tx, input_rx) = watch::channel(FrameInput::default());
        Self {
            input_tx,
            input_rx,
            phase: Arc::new(Mutex::new(0.0)),
            handle: None,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(frames_per_second.max(1))),
        }
    }

    /// Begin the per-frame task. Idempotent: a second call while running
    /// is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let phase = Arc::clone(&self.phase);
        let mut input_rx = self.input_rx.clone();
        let frame_interval = self.frame_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let input = *input_rx.borrow_and_update();
                let speed = frame_speed(input.total_current, input.switch_closed);
                if let Ok(mut offset) = phase.lock() {
                    *offset = advance_phase(*offset, speed);
                }
            }
        });

        self.handle = Some(handle);
        info!("animation driver started");
    }

    /// Stop the per-frame task deterministically. No further phase updates
    /// occur after this returns.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("animation driver stopped");
        }
    }

    /// Submit the latest evaluated quantities. The next frame's speed
    /// calculation observes this value.
    pub fn submit(&self, input: FrameInput) {
        // The driver holds a receiver for its whole lifetime, so this
        // cannot fail; values submitted while stopped are picked up on
        // the first frame after a restart.
        let _ = self.input_tx.send(input);
    }

    /// Current phase offset, read-only to the renderer.
    pub fn offset(&self) -> f64 {
        self.phase.lock().map(|offset| *offset).unwrap_or(0.0)
    }

    /// Idempotently return the phase to its initial value. Used when the
    /// host switches views; never called implicitly.
    pub fn reset(&self) {
        if let Ok(mut offset) = self.phase.lock() {
            *offset = 0.0;
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        // No stale updates may outlive the owning view.
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_proportional_to_current() {
        assert_eq!(frame_speed(0.03, true), 0.06);
        assert_eq!(frame_speed(1.0, true), 2.0);
    }

    #[test]
    fn test_speed_capped() {
        assert_eq!(frame_speed(5.0, true), 10.0);
        assert_eq!(frame_speed(1e9, true), 10.0);
    }

    #[test]
    fn test_speed_zero_when_switch_open() {
        // Open switch collapses motion even with a nonzero decaying current.
        assert_eq!(frame_speed(0.5, false), 0.0);
    }

    #[test]
    fn test_phase_wraps_modulo_period() {
        let offset = advance_phase(3.0, 10.0);
        assert_eq!(offset, 993.0);
        assert_eq!(advance_phase(offset, 0.0), 993.0);

        // Many frames never escape [0, PHASE_PERIOD).
        let mut offset = 0.0;
        for _ in 0..10_000 {
            offset = advance_phase(offset, MAX_SPEED);
            assert!((0.0..PHASE_PERIOD).contains(&offset));
        }
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let mut driver = AnimationDriver::with_frame_rate(1000);
        assert!(!driver.is_running());

        driver.start();
        assert!(driver.is_running());
        driver.submit(FrameInput {
            total_current: 1.0,
            switch_closed: true,
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(driver.offset() != 0.0, "phase should advance while running");

        driver.stop();
        assert!(!driver.is_running());
        let frozen = driver.offset();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(driver.offset(), frozen, "no updates after stop");
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mut driver = AnimationDriver::with_frame_rate(1000);
        driver.start();
        driver.start();
        assert!(driver.is_running());
        driver.stop();
    }

    #[tokio::test]
    async fn test_open_switch_freezes_phase() {
        let mut driver = AnimationDriver::with_frame_rate(1000);
        driver.submit(FrameInput {
            total_current: 2.0,
            switch_closed: false,
        });
        driver.start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(driver.offset(), 0.0);
        driver.stop();
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let mut driver = AnimationDriver::with_frame_rate(1000);
        driver.start();
        driver.submit(FrameInput {
            total_current: 1.0,
            switch_closed: true,
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        driver.stop();

        driver.reset();
        assert_eq!(driver.offset(), 0.0);
        driver.reset();
        assert_eq!(driver.offset(), 0.0);
    }
}
