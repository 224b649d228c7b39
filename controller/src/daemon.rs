//! Background housekeeping trigger
//!
//! Every controller construction rolls a fixed-probability dice and, on a
//! hit, schedules the housekeeping collaborator fire-and-forget. Failures
//! in the housekeeper never reach the dispatch path, and the trigger never
//! blocks beyond task creation. [`spawn_periodic`] is the decoupled
//! alternative for embedders that prefer a timer over per-construction
//! rolls.

use crate::metrics_defs::HOUSEKEEPING_RUNS;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default chance that one controller construction schedules a run (1.5%)
pub const DEFAULT_PROBABILITY: f64 = 0.015;

/// Opaque housekeeping collaborator; its internal behavior is out of scope
#[async_trait]
pub trait Housekeeper: Send + Sync {
    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Probabilistic, fire-and-forget scheduler for a [`Housekeeper`]
#[derive(Clone)]
pub struct HousekeepingTrigger {
    housekeeper: Arc<dyn Housekeeper>,
    probability: f64,
}

impl HousekeepingTrigger {
    pub fn new(housekeeper: Arc<dyn Housekeeper>) -> Self {
        Self {
            housekeeper,
            probability: DEFAULT_PROBABILITY,
        }
    }

    /// Overrides the trigger probability, clamped to `0.0..=1.0`
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Rolls the dice; on a hit, schedules the housekeeper without awaiting
    /// it. Returns whether a run was scheduled.
    ///
    /// Must be called within a Tokio runtime when the roll can hit.
    pub fn maybe_spawn(&self) -> bool {
        if !rand::thread_rng().gen_bool(self.probability) {
            return false;
        }
        self.spawn();
        true
    }

    /// Unconditionally schedules one housekeeping run, fire-and-forget
    pub fn spawn(&self) {
        let housekeeper = Arc::clone(&self.housekeeper);
        debug!("scheduling housekeeping run");
        metrics::counter!(HOUSEKEEPING_RUNS.name).increment(1);
        tokio::spawn(async move {
            if let Err(error) = housekeeper.run().await {
                warn!(%error, "housekeeping run failed");
            }
        });
    }
}

/// Runs the housekeeper on a fixed interval, decoupled from request
/// traffic. Dropping the returned handle does not stop the task; abort it
/// for shutdown.
pub fn spawn_periodic(housekeeper: Arc<dyn Housekeeper>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            metrics::counter!(HOUSEKEEPING_RUNS.name).increment(1);
            if let Err(error) = housekeeper.run().await {
                warn!(%error, "housekeeping run failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{CountingHousekeeper, FailingHousekeeper};

    #[test]
    fn zero_probability_never_fires() {
        let housekeeper = Arc::new(CountingHousekeeper::default());
        let trigger =
            HousekeepingTrigger::new(housekeeper.clone() as Arc<dyn Housekeeper>).with_probability(0.0);

        for _ in 0..100 {
            assert!(!trigger.maybe_spawn());
        }
        assert_eq!(housekeeper.runs(), 0);
    }

    #[tokio::test]
    async fn certain_probability_always_fires() {
        let housekeeper = Arc::new(CountingHousekeeper::default());
        let trigger =
            HousekeepingTrigger::new(housekeeper.clone() as Arc<dyn Housekeeper>).with_probability(1.0);

        assert!(trigger.maybe_spawn());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(housekeeper.runs(), 1);
    }

    #[tokio::test]
    async fn housekeeper_failure_is_swallowed() {
        let trigger = HousekeepingTrigger::new(Arc::new(FailingHousekeeper)).with_probability(1.0);

        assert!(trigger.maybe_spawn());
        // The spawned task logs the failure; nothing to observe but no panic
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn periodic_runner_keeps_ticking() {
        let housekeeper = Arc::new(CountingHousekeeper::default());
        let handle = spawn_periodic(
            housekeeper.clone() as Arc<dyn Housekeeper>,
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();
        assert!(housekeeper.runs() >= 2);
    }

    #[test]
    fn probability_is_clamped() {
        let housekeeper = Arc::new(CountingHousekeeper::default());
        let trigger =
            HousekeepingTrigger::new(housekeeper as Arc<dyn Housekeeper>).with_probability(-3.0);
        // A negative input clamps to 0.0 rather than panicking in gen_bool
        assert!(!trigger.maybe_spawn());
    }
}
