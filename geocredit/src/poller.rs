//! Periodic refresh of engine credits.
//!
//! [`CreditPoller`] is a pull-based adapter: the owner calls [`CreditPoller::tick`] and the poller
//! decides, according to its [`Clock`], whether the credit getter must be invoked again. This keeps
//! the refresh logic deterministic and testable with a [`ManualClock`](crate::clock::ManualClock).
//!
//! [`PollingHandle`] drives a poller on a tokio runtime for applications that don't have their own
//! frame loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use web_time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::credit::CreditsSnapshot;
use crate::error::GeocreditError;
use crate::messenger::Messenger;
use crate::source::CreditSource;

/// Default interval between two calls of the credit getter.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(3000);

/// Holds the latest credits snapshot of a [`CreditSource`] and refreshes it periodically.
///
/// The source is called once on creation and then once per period. The held snapshot is only
/// replaced if the new one is different by value, so a source that returns freshly allocated but
/// equal snapshots never triggers a change.
pub struct CreditPoller<S, C = SystemClock> {
    source: S,
    clock: C,
    period: Duration,
    last_poll: Instant,
    snapshot: Option<CreditsSnapshot>,
    active: bool,
}

impl<S: CreditSource> CreditPoller<S, SystemClock> {
    /// Creates a poller using the system time.
    pub fn with_system_clock(source: S) -> Self {
        Self::new(source, SystemClock)
    }
}

impl<S: CreditSource, C: Clock> CreditPoller<S, C> {
    /// Creates a new poller and calls the source for the first time.
    pub fn new(source: S, clock: C) -> Self {
        let last_poll = clock.now();
        let mut poller = Self {
            source,
            clock,
            period: DEFAULT_POLL_PERIOD,
            last_poll,
            snapshot: None,
            active: true,
        };
        poller.poll_now();
        poller
    }

    /// Sets the interval between calls of the source.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Interval between calls of the source.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Latest snapshot received from the source.
    pub fn snapshot(&self) -> Option<&CreditsSnapshot> {
        self.snapshot.as_ref()
    }

    /// Returns false after [`CreditPoller::teardown`].
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Instant of the next scheduled call of the source.
    ///
    /// Returns `None` after teardown, or if the period is too long to ever elapse.
    pub fn next_poll_at(&self) -> Option<Instant> {
        if !self.active {
            return None;
        }

        self.last_poll.checked_add(self.period)
    }

    /// Calls the source if the period has elapsed since the last call.
    ///
    /// Returns true if the held snapshot was replaced.
    pub fn tick(&mut self) -> bool {
        match self.next_poll_at() {
            Some(at) if self.clock.now() >= at => self.poll_now(),
            _ => false,
        }
    }

    /// Calls the source immediately. Returns true if the held snapshot was replaced.
    ///
    /// Errors of the source are logged and don't stop the polling.
    pub fn poll_now(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.last_poll = self.clock.now();

        match self.source.credits() {
            Ok(Some(snapshot)) => {
                if self.snapshot.as_ref() == Some(&snapshot) {
                    log::trace!("Credits did not change");
                    return false;
                }

                log::debug!(
                    "Credits changed: {} lightbox, {} screen",
                    snapshot.lightbox.len(),
                    snapshot.screen.len()
                );
                self.snapshot = Some(snapshot);
                true
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("Failed to get credits from the source: {err}");
                false
            }
        }
    }

    /// Stops the polling. The source will not be called anymore.
    pub fn teardown(&mut self) {
        if self.active {
            log::debug!("Credit polling stopped");
            self.active = false;
        }
    }
}

/// Handle of a poller running on a tokio runtime.
///
/// Dropping the handle stops the polling.
pub struct PollingHandle {
    task: JoinHandle<()>,
    receiver: watch::Receiver<Option<CreditsSnapshot>>,
}

impl PollingHandle {
    /// Starts calling the poller every period of the poller.
    ///
    /// Every time the snapshot changes, it is published to the subscribers of the handle and the
    /// messenger is asked to redraw.
    ///
    /// Fails with [`GeocreditError::Configuration`] if called outside of a tokio runtime, or if
    /// the period of the poller is zero or too long to schedule.
    pub fn spawn<S, C>(
        mut poller: CreditPoller<S, C>,
        messenger: Option<Arc<dyn Messenger>>,
    ) -> Result<Self, GeocreditError>
    where
        S: CreditSource + Send + 'static,
        C: Clock + Send + 'static,
    {
        let period = poller.period();
        if period.is_zero() {
            return Err(GeocreditError::Configuration(
                "polling period must be greater than zero".into(),
            ));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|err| {
            GeocreditError::Configuration(format!("credit polling requires a tokio runtime: {err}"))
        })?;

        let start = tokio::time::Instant::now()
            .checked_add(period)
            .ok_or_else(|| {
                GeocreditError::Configuration(format!("polling period {period:?} is too long"))
            })?;

        let (sender, receiver) = watch::channel(poller.snapshot().cloned());

        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                log::trace!("Polling credits");

                if poller.poll_now() {
                    sender.send_replace(poller.snapshot().cloned());
                    if let Some(messenger) = &messenger {
                        messenger.request_redraw();
                    }
                }
            }
        });

        Ok(Self { task, receiver })
    }

    /// Latest snapshot of the poller.
    pub fn snapshot(&self) -> Option<CreditsSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Returns a receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<Option<CreditsSnapshot>> {
        self.receiver.clone()
    }

    /// Stops the polling.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::clock::ManualClock;
    use crate::credit::CreditItem;

    fn snapshot(text: &str) -> CreditsSnapshot {
        CreditsSnapshot {
            engine: None,
            lightbox: vec![],
            screen: vec![CreditItem::html(text)],
        }
    }

    /// Source returning the given values one by one, repeating the last one.
    fn sequence_source(
        values: Vec<Option<CreditsSnapshot>>,
    ) -> (impl Fn() -> Option<CreditsSnapshot>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let source = move || {
            let call = counter.get();
            counter.set(call + 1);
            values[call.min(values.len() - 1)].clone()
        };

        (source, calls)
    }

    #[test]
    fn initial_poll_on_creation() {
        let (source, calls) = sequence_source(vec![Some(snapshot("S1"))]);
        let poller = CreditPoller::new(source, ManualClock::new());

        assert_eq!(calls.get(), 1);
        assert_eq!(poller.snapshot(), Some(&snapshot("S1")));
    }

    #[test]
    fn tick_waits_for_period() {
        let clock = ManualClock::new();
        let (source, calls) = sequence_source(vec![Some(snapshot("S1")), Some(snapshot("S2"))]);
        let mut poller = CreditPoller::new(source, clock.clone());

        clock.advance(Duration::from_millis(2999));
        assert!(!poller.tick());
        assert_eq!(calls.get(), 1);

        clock.advance(Duration::from_millis(1));
        assert!(poller.tick());
        assert_eq!(calls.get(), 2);
        assert_eq!(poller.snapshot(), Some(&snapshot("S2")));
    }

    #[test]
    fn equal_snapshot_is_not_a_change() {
        let clock = ManualClock::new();
        let (source, calls) = sequence_source(vec![
            Some(snapshot("S1")),
            Some(snapshot("S1")),
            Some(snapshot("S2")),
            Some(snapshot("S2")),
        ]);
        let mut poller = CreditPoller::new(source, clock.clone());

        let mut changes = vec![];
        for _ in 0..3 {
            clock.advance(DEFAULT_POLL_PERIOD);
            changes.push(poller.tick());
        }

        assert_eq!(changes, [false, true, false]);
        assert_eq!(calls.get(), 4);
        assert_eq!(poller.snapshot(), Some(&snapshot("S2")));
    }

    #[test]
    fn empty_result_keeps_snapshot() {
        let clock = ManualClock::new();
        let (source, _) = sequence_source(vec![Some(snapshot("S1")), None]);
        let mut poller = CreditPoller::new(source, clock.clone());

        clock.advance(DEFAULT_POLL_PERIOD);
        assert!(!poller.tick());
        assert_eq!(poller.snapshot(), Some(&snapshot("S1")));
    }

    #[test]
    fn custom_period() {
        let clock = ManualClock::new();
        let (source, calls) = sequence_source(vec![Some(snapshot("S1"))]);
        let mut poller =
            CreditPoller::new(source, clock.clone()).with_period(Duration::from_millis(500));

        clock.advance(Duration::from_millis(500));
        poller.tick();
        assert_eq!(calls.get(), 2);
        assert_eq!(
            poller.next_poll_at(),
            Some(clock.now() + Duration::from_millis(500))
        );
    }

    #[test]
    fn unreachable_period_is_never_due() {
        let clock = ManualClock::new();
        let (source, calls) = sequence_source(vec![Some(snapshot("S1"))]);
        let mut poller = CreditPoller::new(source, clock.clone()).with_period(Duration::MAX);

        assert_eq!(poller.next_poll_at(), None);
        clock.advance(DEFAULT_POLL_PERIOD * 100);
        assert!(!poller.tick());
        assert_eq!(calls.get(), 1);
        assert!(poller.is_active());
    }

    #[test]
    fn no_calls_after_teardown() {
        let clock = ManualClock::new();
        let (source, calls) = sequence_source(vec![Some(snapshot("S1")), Some(snapshot("S2"))]);
        let mut poller = CreditPoller::new(source, clock.clone());

        poller.teardown();
        poller.teardown();
        assert!(!poller.is_active());
        assert_eq!(poller.next_poll_at(), None);

        clock.advance(DEFAULT_POLL_PERIOD * 10);
        assert!(!poller.tick());
        assert!(!poller.poll_now());
        assert_eq!(calls.get(), 1);
        assert_eq!(poller.snapshot(), Some(&snapshot("S1")));
    }

    struct FlakySource {
        calls: Cell<usize>,
    }

    impl CreditSource for FlakySource {
        fn credits(&self) -> Result<Option<CreditsSnapshot>, GeocreditError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            match call {
                1 => Err(GeocreditError::Generic("engine is not ready".into())),
                _ => Ok(Some(snapshot(&format!("S{call}")))),
            }
        }
    }

    #[test]
    fn source_error_does_not_stop_polling() {
        let clock = ManualClock::new();
        let mut poller = CreditPoller::new(
            FlakySource {
                calls: Cell::new(0),
            },
            clock.clone(),
        );

        clock.advance(DEFAULT_POLL_PERIOD);
        assert!(!poller.tick());
        assert_eq!(poller.snapshot(), Some(&snapshot("S0")));

        clock.advance(DEFAULT_POLL_PERIOD);
        assert!(poller.tick());
        assert_eq!(poller.snapshot(), Some(&snapshot("S2")));
        assert!(poller.is_active());
    }

    fn counting_source(calls: Arc<AtomicUsize>) -> impl Fn() -> Option<CreditsSnapshot> + Send {
        move || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            Some(snapshot(&format!("S{call}")))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn handle_publishes_changes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let redraws = Arc::new(AtomicUsize::new(0));
        let redraw_counter = redraws.clone();
        let messenger: Arc<dyn Messenger> = Arc::new(move || {
            redraw_counter.fetch_add(1, Ordering::SeqCst);
        });

        let poller = CreditPoller::with_system_clock(counting_source(calls.clone()));
        let handle = PollingHandle::spawn(poller, Some(messenger)).unwrap();
        assert_eq!(handle.snapshot(), Some(snapshot("S0")));

        tokio::time::sleep(Duration::from_millis(3100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(redraws.load(Ordering::SeqCst), 1);
        assert_eq!(handle.snapshot(), Some(snapshot("S1")));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = CreditPoller::with_system_clock(counting_source(calls.clone()));
        let handle = PollingHandle::spawn(poller, None).unwrap();
        let mut receiver = handle.subscribe();

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert!(receiver.has_changed().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(handle);
        tokio::time::sleep(DEFAULT_POLL_PERIOD * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_handle_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = CreditPoller::with_system_clock(counting_source(calls.clone()));
        let handle = PollingHandle::spawn(poller, None).unwrap();

        handle.cancel();
        tokio::time::sleep(DEFAULT_POLL_PERIOD * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let source = || -> Option<CreditsSnapshot> { None };
        let poller = CreditPoller::with_system_clock(source).with_period(Duration::ZERO);
        let result = PollingHandle::spawn(poller, None);
        assert!(matches!(result, Err(GeocreditError::Configuration(_))));
    }

    #[tokio::test]
    async fn unreachable_period_is_rejected() {
        let source = || -> Option<CreditsSnapshot> { None };
        let poller = CreditPoller::with_system_clock(source).with_period(Duration::MAX);
        let result = PollingHandle::spawn(poller, None);
        assert!(matches!(result, Err(GeocreditError::Configuration(_))));
    }

    #[test]
    fn spawn_outside_of_runtime_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = CreditPoller::with_system_clock(counting_source(calls.clone()));
        let result = PollingHandle::spawn(poller, None);
        assert!(matches!(result, Err(GeocreditError::Configuration(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
