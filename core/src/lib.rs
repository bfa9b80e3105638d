//! # Six Cities Core
//!
//! Core traits and types for the six cities state container.
//!
//! The application state is driven by the Reducer pattern: every change to
//! state goes through a single pure function, and every side effect (an HTTP
//! call, a token write) is described as an [`Effect`](effect::Effect) value
//! that the runtime executes on the reducer's behalf.
//!
//! ## Core Concepts
//!
//! - **State**: The view-state snapshot of the application
//! - **Action**: All possible inputs to a reducer (user intents and server outcomes)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Operation**: An async request with an explicit requested/terminal lifecycle
//!
//! ## Example
//!
//! ```
//! use six_cities_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CityState {
//!     city: String,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CityAction {
//!     ChangeCity { city: String },
//! }
//!
//! struct CityReducer;
//!
//! impl Reducer for CityReducer {
//!     type State = CityState;
//!     type Action = CityAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CityState,
//!         action: CityAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CityAction>; 4]> {
//!         match action {
//!             CityAction::ChangeCity { city } => state.city = city,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CityState::default();
//! let _effects = CityReducer.reduce(&mut state, CityAction::ChangeCity { city: "Paris".into() }, &());
//! assert_eq!(state.city, "Paris");
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Explicit lifecycle for async operations
pub mod operation;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They hold all of the application's state logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        ///
        /// Completion order between the children is not specified.
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }

        /// Number of futures this effect will spawn
        #[must_use]
        pub fn future_count(&self) -> usize {
            match self {
                Effect::None => 0,
                Effect::Parallel(effects) => effects.iter().map(Effect::future_count).sum(),
                Effect::Future(_) => 1,
            }
        }
    }
}
