//! # Six Cities Testing
//!
//! Testing utilities and helpers for the six cities state container.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`ActionRecorder`]: Captures every action a store reduces
//! - [`check_lifecycles`]: Verifies requested/terminal pairing in a recorded stream
//! - [`init_tracing`]: Test-friendly tracing subscriber
//!
//! ## Example
//!
//! ```ignore
//! use six_cities_testing::{ActionRecorder, check_lifecycles};
//!
//! #[tokio::test]
//! async fn every_request_settles() {
//!     let store = test_store();
//!     let recorder = ActionRecorder::attach(&store);
//!
//!     store.send(AppAction::FetchOffers).await?.wait().await;
//!
//!     let report = check_lifecycles(&recorder.actions().await, AppAction::lifecycle)?;
//!     assert!(report.is_settled());
//! }
//! ```

use six_cities_core::operation::{Lifecycle, LifecycleError, Phase};
use six_cities_core::reducer::Reducer;
use six_cities_runtime::Store;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;


pub use reducer_test::{assertions, ReducerTest};

/// Install a fmt subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Records every action broadcast by a store
///
/// The recorder subscribes on construction, so attach it before sending the
/// actions you want to observe.
pub struct ActionRecorder<A> {
    actions: Arc<Mutex<Vec<A>>>,
    task: JoinHandle<()>,
}

impl<A> ActionRecorder<A>
where
    A: Clone + Send + 'static,
{
    /// Subscribe to a store's action broadcast
    #[must_use]
    pub fn attach<S, E, R>(store: &Store<S, A, E, R>) -> Self
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        Self::from_receiver(store.subscribe_actions())
    }

    /// Record from an existing broadcast receiver
    #[must_use]
    pub fn from_receiver(mut rx: broadcast::Receiver<A>) -> Self {
        let actions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&actions);

        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(action) => sink.lock().await.push(action),
                    Err(broadcast::error::RecvError::Lagged(_)) => {},
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { actions, task }
    }

    /// Snapshot of the actions recorded so far
    pub async fn actions(&self) -> Vec<A> {
        self.actions.lock().await.clone()
    }

    /// Wait until at least `count` actions have been recorded
    ///
    /// Returns `false` if the timeout elapses first.
    pub async fn wait_for_count(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.actions.lock().await.len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl<A> Drop for ActionRecorder<A> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A recorded stream broke the requested/terminal contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleViolation<K: std::fmt::Debug> {
    /// A terminal event arrived with no matching requested event
    #[error("terminal event for {kind:?} at index {index} has no open request")]
    TerminalWithoutRequest {
        /// Operation the event belongs to
        kind: K,
        /// Position in the recorded stream
        index: usize,
    },

    /// A lifecycle transition was rejected
    #[error("{kind:?} at index {index}: {source}")]
    InvalidTransition {
        /// Operation the event belongs to
        kind: K,
        /// Position in the recorded stream
        index: usize,
        /// Rejected transition
        source: LifecycleError,
    },
}

/// Per-operation counts from [`check_lifecycles`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport<K: Eq + Hash> {
    /// Requested events per operation
    pub requested: HashMap<K, usize>,
    /// Success terminals per operation
    pub succeeded: HashMap<K, usize>,
    /// Failure terminals per operation
    pub failed: HashMap<K, usize>,
    /// Requests still waiting for a terminal
    pub open: HashMap<K, usize>,
}

impl<K: Eq + Hash> LifecycleReport<K> {
    /// Whether every request has settled
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.open.values().all(|n| *n == 0)
    }

    /// Requested events for one operation
    #[must_use]
    pub fn requested(&self, kind: &K) -> usize {
        self.requested.get(kind).copied().unwrap_or(0)
    }

    /// Success terminals for one operation
    #[must_use]
    pub fn succeeded(&self, kind: &K) -> usize {
        self.succeeded.get(kind).copied().unwrap_or(0)
    }

    /// Failure terminals for one operation
    #[must_use]
    pub fn failed(&self, kind: &K) -> usize {
        self.failed.get(kind).copied().unwrap_or(0)
    }
}

/// Check that every terminal event in `actions` closes an earlier request
///
/// `classify` maps an action to its operation and phase, or `None` for
/// synchronous actions. Requests of the same operation may overlap; terminals
/// close them in FIFO order.
///
/// # Errors
///
/// Returns [`LifecycleViolation`] on the first terminal with no open request.
pub fn check_lifecycles<A, K, F>(
    actions: &[A],
    classify: F,
) -> Result<LifecycleReport<K>, LifecycleViolation<K>>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    F: Fn(&A) -> Option<(K, Phase)>,
{
    let mut in_flight: HashMap<K, VecDeque<Lifecycle>> = HashMap::new();
    let mut report = LifecycleReport {
        requested: HashMap::new(),
        succeeded: HashMap::new(),
        failed: HashMap::new(),
        open: HashMap::new(),
    };

    for (index, action) in actions.iter().enumerate() {
        let Some((kind, phase)) = classify(action) else {
            continue;
        };
        let queue = in_flight.entry(kind.clone()).or_default();

        let transition = match phase {
            Phase::Idle => continue,
            Phase::Requested => {
                let mut lifecycle = Lifecycle::new();
                let result = lifecycle.request();
                queue.push_back(lifecycle);
                *report.requested.entry(kind.clone()).or_default() += 1;
                result
            },
            Phase::Succeeded | Phase::Failed => {
                let Some(mut lifecycle) = queue.pop_front() else {
                    return Err(LifecycleViolation::TerminalWithoutRequest { kind, index });
                };
                let counts = if phase == Phase::Succeeded {
                    &mut report.succeeded
                } else {
                    &mut report.failed
                };
                *counts.entry(kind.clone()).or_default() += 1;
                lifecycle.advance(phase)
            },
        };

        if let Err(source) = transition {
            return Err(LifecycleViolation::InvalidTransition {
                kind,
                index,
                source,
            });
        }
    }

    report.open = in_flight
        .into_iter()
        .map(|(kind, queue)| (kind, queue.len()))
        .collect();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Load(u8),
        Loaded(u8),
        LoadFailed(u8),
        Select,
    }

    fn classify(event: &Event) -> Option<(&'static str, Phase)> {
        match event {
            Event::Load(_) => Some(("load", Phase::Requested)),
            Event::Loaded(_) => Some(("load", Phase::Succeeded)),
            Event::LoadFailed(_) => Some(("load", Phase::Failed)),
            Event::Select => None,
        }
    }

    #[test]
    fn settled_stream() {
        let events = [
            Event::Load(1),
            Event::Select,
            Event::Load(2),
            Event::LoadFailed(1),
            Event::Loaded(2),
        ];
        let Ok(report) = check_lifecycles(&events, classify) else {
            unreachable!("stream is well formed");
        };
        assert!(report.is_settled());
        assert_eq!(report.requested(&"load"), 2);
        assert_eq!(report.succeeded(&"load"), 1);
        assert_eq!(report.failed(&"load"), 1);
    }

    #[test]
    fn open_request_is_reported() {
        let events = [Event::Load(1)];
        let Ok(report) = check_lifecycles(&events, classify) else {
            unreachable!("stream is well formed");
        };
        assert!(!report.is_settled());
    }

    #[test]
    fn orphan_terminal_is_rejected() {
        let events = [Event::Load(1), Event::Loaded(1), Event::Loaded(1)];
        assert_eq!(
            check_lifecycles(&events, classify),
            Err(LifecycleViolation::TerminalWithoutRequest {
                kind: "load",
                index: 2
            })
        );
    }

    #[tokio::test]
    async fn recorder_captures_broadcast() {
        let (tx, rx) = broadcast::channel(8);
        let recorder = ActionRecorder::from_receiver(rx);

        let _ = tx.send(Event::Select);
        let _ = tx.send(Event::Load(3));

        assert!(recorder.wait_for_count(2, Duration::from_secs(1)).await);
        assert_eq!(recorder.actions().await, vec![Event::Select, Event::Load(3)]);
    }
}
