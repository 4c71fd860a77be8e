//! algeff: a runtime for algebraic effects.
//!
//! Computations declare abstract actions they need performed; handler tables
//! supply the how, later and elsewhere. The `handle` dispatch loop drives a
//! computation, intercepts its actions, routes each to a matching handler
//! entry, and forwards effects a handler does not claim, so handling
//! composes by nesting.
//!
//! # Architecture
//!
//! - **Free-monad computation bodies**: `Program` (Pure/Perform/AndThen/Map)
//!   driven by a mode-based step machine over an explicit frame stack
//! - **One-shot tactics**: `resume`/`abort` tokens guarded by a state cell;
//!   a second use is an explicit error, never a replay
//! - **Two-level dispatch**: (effect name, operation name) hash lookup;
//!   entry shape alone discriminates value-shaped from operation-shaped
//! - **Forwarding**: unmatched actions re-suspend the handled computation,
//!   so enclosing `handle` calls or the top-level driver can resolve them

pub mod action;
pub mod computation;
pub mod dispatch;
pub mod driver;
pub mod effect;
pub mod error;
pub mod handler;
pub mod ids;
pub mod program;
pub mod tactics;
pub mod value;

// Re-exports for convenience
pub use action::Action;
pub use computation::{defer, Deferred, Effectful, IntoEffectful, Step};
pub use dispatch::{handle, Handled};
pub use driver::{run, run_with};
pub use effect::{Effect, EffectBuilder, Op};
pub use error::EffectError;
pub use handler::{Entry, HandlerFn, Handlers};
pub use ids::DispatchId;
pub use program::{Program, Running};
pub use tactics::{TacticKind, Tactics};
pub use value::Value;
