//! Async operation lifecycle.
//!
//! Every async operation of the state container walks a single path:
//!
//! ```text
//! Idle ──▶ Requested ──▶ Succeeded
//!                    └──▶ Failed
//! ```
//!
//! The *requested* event is the command action the caller sends to the store.
//! An [`Operation`] wraps the transport future and maps its outcome to exactly
//! one terminal action, so the runtime can never emit both a success and a
//! failure (or neither) for a single request.
//!
//! [`Lifecycle`] is the explicit state machine behind that contract, used by
//! observers that check a recorded action stream.

use crate::effect::Effect;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Phase of an async operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not started
    #[default]
    Idle,
    /// Requested event dispatched, transport call in flight
    Requested,
    /// Terminal: the transport call succeeded
    Succeeded,
    /// Terminal: the transport call failed
    Failed,
}

impl Phase {
    /// Whether this phase ends the lifecycle
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether `self -> next` is an allowed transition
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Requested) | (Self::Requested, Self::Succeeded | Self::Failed)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Rejected lifecycle transition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid lifecycle transition: {from} -> {to}")]
pub struct LifecycleError {
    /// Phase the lifecycle was in
    pub from: Phase,
    /// Phase that was requested
    pub to: Phase,
}

/// State machine for one async operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    /// Create an idle lifecycle
    #[must_use]
    pub const fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if `next` is not reachable from the current phase.
    pub fn advance(&mut self, next: Phase) -> Result<(), LifecycleError> {
        if !self.phase.can_advance_to(next) {
            return Err(LifecycleError {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// `Idle -> Requested`
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] unless the lifecycle is idle.
    pub fn request(&mut self) -> Result<(), LifecycleError> {
        self.advance(Phase::Requested)
    }

    /// `Requested -> Succeeded`
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] unless a request is in flight.
    pub fn succeed(&mut self) -> Result<(), LifecycleError> {
        self.advance(Phase::Succeeded)
    }

    /// `Requested -> Failed`
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] unless a request is in flight.
    pub fn fail(&mut self) -> Result<(), LifecycleError> {
        self.advance(Phase::Failed)
    }
}

/// Boxed future producing the terminal action of an operation
type TerminalFuture<A> = Pin<Box<dyn Future<Output = A> + Send>>;

/// An in-flight async operation
///
/// Built from a fallible future plus one mapping per outcome. Converting it
/// into an [`Effect`] yields a future that resolves to exactly one terminal
/// action.
///
/// # Example
///
/// ```
/// use six_cities_core::operation::Operation;
///
/// #[derive(Debug, PartialEq)]
/// enum Action {
///     Loaded(u32),
///     Failed(String),
/// }
///
/// let operation = Operation::new(
///     async { Ok::<_, String>(3) },
///     Action::Loaded,
///     Action::Failed,
/// );
///
/// let action = futures::executor::block_on(operation.settle());
/// assert_eq!(action, Action::Loaded(3));
/// ```
pub struct Operation<A> {
    future: TerminalFuture<(Phase, A)>,
}

impl<A> Operation<A>
where
    A: Send + 'static,
{
    /// Create an operation in the `Requested` phase
    pub fn new<T, E, Fut, S, F>(future: Fut, on_success: S, on_failure: F) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        S: FnOnce(T) -> A + Send + 'static,
        F: FnOnce(E) -> A + Send + 'static,
    {
        let future = async move {
            match future.await {
                Ok(value) => (Phase::Succeeded, on_success(value)),
                Err(error) => (Phase::Failed, on_failure(error)),
            }
        };

        Self {
            future: Box::pin(future),
        }
    }

    /// Await the transport call and return the terminal action
    pub async fn settle(self) -> A {
        self.future.await.1
    }

    /// Await the transport call and return the terminal phase with its action
    pub async fn settle_with_phase(self) -> (Phase, A) {
        self.future.await
    }

    /// Convert into an effect that feeds the terminal action back to the store
    #[must_use]
    pub fn into_effect(self) -> Effect<A> {
        Effect::Future(Box::pin(async move { Some(self.settle().await) }))
    }
}

impl<A> std::fmt::Debug for Operation<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_allowed_path() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Idle);

        assert!(lifecycle.request().is_ok());
        assert_eq!(lifecycle.phase(), Phase::Requested);

        assert!(lifecycle.succeed().is_ok());
        assert!(lifecycle.phase().is_terminal());
    }

    #[test]
    fn terminal_phase_is_final() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.request().is_ok());
        assert!(lifecycle.fail().is_ok());

        assert_eq!(
            lifecycle.succeed(),
            Err(LifecycleError {
                from: Phase::Failed,
                to: Phase::Succeeded
            })
        );
        assert_eq!(lifecycle.phase(), Phase::Failed);
    }

    #[test]
    fn cannot_settle_before_request() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.succeed().is_err());
        assert!(lifecycle.fail().is_err());
        assert_eq!(lifecycle.phase(), Phase::Idle);
    }

    #[test]
    fn cannot_request_twice() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.request().is_ok());
        assert!(lifecycle.request().is_err());
    }

    #[test]
    fn operation_maps_success() {
        let operation = Operation::new(async { Ok::<u8, String>(7) }, |v| v.to_string(), |e| e);
        let (phase, action) = tokio_test::block_on(operation.settle_with_phase());
        assert_eq!(phase, Phase::Succeeded);
        assert_eq!(action, "7");
    }

    #[test]
    fn operation_maps_failure() {
        let operation = Operation::new(
            async { Err::<u8, _>("offline".to_string()) },
            |v| v.to_string(),
            |e| format!("failed: {e}"),
        );
        let (phase, action) = tokio_test::block_on(operation.settle_with_phase());
        assert_eq!(phase, Phase::Failed);
        assert_eq!(action, "failed: offline");
    }

    #[test]
    fn operation_effect_yields_one_action() {
        let effect = Operation::new(async { Ok::<u8, ()>(1) }, |v| v, |()| 0).into_effect();
        let Effect::Future(future) = effect else {
            unreachable!("operations always convert to Effect::Future");
        };
        assert_eq!(tokio_test::block_on(future), Some(1));
    }

    fn any_phase() -> impl Strategy<Value = Phase> {
        prop_oneof![
            Just(Phase::Idle),
            Just(Phase::Requested),
            Just(Phase::Succeeded),
            Just(Phase::Failed),
        ]
    }

    proptest! {
        #[test]
        fn arbitrary_walks_never_leave_a_terminal_phase(steps in proptest::collection::vec(any_phase(), 0..16)) {
            let mut lifecycle = Lifecycle::new();
            let mut settled: Option<Phase> = None;

            for step in steps {
                let before = lifecycle.phase();
                let result = lifecycle.advance(step);
                prop_assert_eq!(result.is_ok(), before.can_advance_to(step));
                if let Some(terminal) = settled {
                    prop_assert_eq!(lifecycle.phase(), terminal);
                }
                if lifecycle.phase().is_terminal() {
                    settled = Some(lifecycle.phase());
                }
            }
        }
    }
}
