//! The polling loop: periodically fetches a fresh reading and publishes it
//! into a single shared slot.

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{
    api::{FetchError, RealTimeSource},
    prelude::*,
    reading::Reading,
};

/// Read-only handle to the single-slot cache of the most recent successful
/// [`Reading`].
///
/// Cloneable into any number of concurrent readers. Reading the slot never
/// blocks the polling loop and never triggers a fetch.
#[derive(Clone)]
pub struct LatestReading(watch::Receiver<Option<Reading>>);

impl LatestReading {
    /// The most recent successful reading, or `None` if no fetch has ever
    /// succeeded.
    #[must_use]
    pub fn get(&self) -> Option<Reading> {
        self.0.borrow().clone()
    }
}

pub struct Monitor {
    latest: watch::Receiver<Option<Reading>>,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Monitor {
    /// Spawn the polling loop.
    ///
    /// The first fetch fires immediately, so readers have data before the
    /// first full period elapses.
    pub fn spawn<S>(source: S, period: Duration) -> Self
    where
        S: RealTimeSource + Send + Sync + 'static,
    {
        let (latest_sender, latest) = watch::channel(None);
        let (stop, stop_receiver) = watch::channel(false);
        let task = tokio::spawn(run(source, period, latest_sender, stop_receiver));
        Self { latest, stop, task }
    }

    #[must_use]
    pub fn latest(&self) -> LatestReading {
        LatestReading(self.latest.clone())
    }

    /// Stop the loop and wait for it to wind down.
    ///
    /// No tick fires afterwards, and an in-flight fetch is abandoned.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

async fn run<S: RealTimeSource>(
    source: S,
    period: Duration,
    latest: watch::Sender<Option<Reading>>,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticks.tick() => {
                tokio::select! {
                    _ = stop.changed() => break,
                    outcome = source.fetch() => apply(&latest, outcome),
                }
            }
        }
    }
    info!("Stopped");
}

fn apply(latest: &watch::Sender<Option<Reading>>, outcome: Result<Reading, FetchError>) {
    match outcome {
        Ok(reading) => {
            info!(%reading, "Fetched");
            latest.send_replace(Some(reading));
        }

        // The slot keeps the previous good reading, the next tick makes an
        // independent attempt.
        Err(error) => warn!("Failed to fetch: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use async_trait::async_trait;
    use chrono::Local;

    use super::*;
    use crate::units::Watts;

    /// Plays back the scripted outcomes, then hangs forever.
    struct Script(Mutex<VecDeque<Result<Reading, FetchError>>>);

    impl Script {
        fn new(outcomes: impl IntoIterator<Item = Result<Reading, FetchError>>) -> Self {
            Self(Mutex::new(outcomes.into_iter().collect()))
        }
    }

    #[async_trait]
    impl RealTimeSource for Script {
        async fn fetch(&self) -> Result<Reading, FetchError> {
            let outcome = self.0.lock().unwrap().pop_front();
            match outcome {
                Some(outcome) => outcome,
                None => std::future::pending().await,
            }
        }
    }

    fn reading(ac_power: f64) -> Reading {
        Reading {
            ac_power: Some(Watts::from(ac_power)),
            yield_today: None,
            yield_total: None,
            feed_in_power: None,
            fetched_at: Local::now(),
        }
    }

    async fn wait_for_ac_power(
        receiver: &mut watch::Receiver<Option<Reading>>,
        ac_power: f64,
    ) -> Result {
        let expected = Some(Watts::from(ac_power));
        tokio::time::timeout(
            Duration::from_secs(1),
            receiver.wait_for(|latest| {
                latest.as_ref().is_some_and(|reading| reading.ac_power == expected)
            }),
        )
        .await
        .context("timed out waiting for the reading")??;
        Ok(())
    }

    #[tokio::test]
    async fn first_fetch_is_immediate() -> Result {
        // One-hour period: only the immediate startup tick can deliver this.
        let monitor = Monitor::spawn(Script::new([Ok(reading(500.0))]), Duration::from_secs(3600));
        let mut receiver = monitor.latest.clone();
        wait_for_ac_power(&mut receiver, 500.0).await?;
        monitor.stop().await;
        Ok(())
    }

    #[tokio::test]
    async fn last_write_wins() -> Result {
        let monitor = Monitor::spawn(
            Script::new([Ok(reading(1.0)), Ok(reading(2.0)), Ok(reading(3.0))]),
            Duration::from_millis(5),
        );
        let mut receiver = monitor.latest.clone();
        wait_for_ac_power(&mut receiver, 3.0).await?;
        assert_eq!(monitor.latest().get().unwrap().ac_power, Some(Watts::from(3.0)));
        monitor.stop().await;
        Ok(())
    }

    #[tokio::test]
    async fn failure_keeps_the_previous_reading() -> Result {
        let monitor = Monitor::spawn(
            Script::new([
                Ok(reading(500.0)),
                Err(FetchError::Vendor("SN error".to_string())),
            ]),
            Duration::from_millis(5),
        );
        let mut receiver = monitor.latest.clone();
        wait_for_ac_power(&mut receiver, 500.0).await?;

        // Plenty of ticks for the failure to be consumed.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(monitor.latest().get().unwrap().ac_power, Some(Watts::from(500.0)));

        monitor.stop().await;
        Ok(())
    }

    #[tokio::test]
    async fn empty_slot_before_the_first_success() -> Result {
        let monitor = Monitor::spawn(
            Script::new([Err(FetchError::Protocol("not JSON".to_string()))]),
            Duration::from_secs(3600),
        );
        let latest = monitor.latest();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(latest.get(), None);
        monitor.stop().await;
        Ok(())
    }

    #[tokio::test]
    async fn stop_halts_the_ticks() -> Result {
        let monitor = Monitor::spawn(
            Script::new([Ok(reading(500.0)), Ok(reading(501.0))]),
            Duration::from_secs(3600),
        );
        let mut receiver = monitor.latest.clone();
        wait_for_ac_power(&mut receiver, 500.0).await?;

        let latest = monitor.latest();

        // `stop` waits for the task, so afterwards nothing is left that
        // could ever publish the second scripted reading.
        monitor.stop().await;
        assert_eq!(latest.get().unwrap().ac_power, Some(Watts::from(500.0)));
        Ok(())
    }
}
