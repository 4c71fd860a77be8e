//! The suspendable-computation contract.
//!
//! An effectful computation supports a single operation, `advance`, which
//! either suspends with an [`Action`] awaiting a resumption value or
//! completes with a final [`Value`]. The first `advance` of a fresh
//! computation ignores its resumption argument; driving a terminal
//! computation again is an error.

use crate::action::Action;
use crate::error::EffectError;
use crate::value::Value;

/// The result of one drive-step.
#[derive(Debug)]
pub enum Step {
    /// The computation paused with an action awaiting resolution.
    Suspended(Action),
    /// The computation finished; it must not be driven again.
    Completed(Value),
}

impl Step {
    pub fn is_suspended(&self) -> bool {
        matches!(self, Step::Suspended(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Step::Completed(_))
    }
}

/// A suspendable unit of work driven by exactly one owner at a time.
pub trait Effectful {
    /// Drive the computation one step, feeding `resumption` into the
    /// suspension point left by the previous step.
    fn advance(&mut self, resumption: Value) -> Result<Step, EffectError>;
}

/// Conversion into a driveable computation.
///
/// Lets `handle` and the drivers accept a [`Program`](crate::program::Program),
/// an already-handled computation, or a deferred producer interchangeably.
pub trait IntoEffectful {
    type Computation: Effectful;

    fn into_effectful(self) -> Self::Computation;
}

/// A computation built lazily from a zero-argument producer.
///
/// The producer runs on the first `advance`, so construction side effects are
/// deferred until the computation is actually driven.
pub struct Deferred<F, C: IntoEffectful> {
    producer: Option<F>,
    inner: Option<C::Computation>,
}

/// Defer computation construction until first drive (point-free composition).
pub fn defer<F, C>(producer: F) -> Deferred<F, C>
where
    F: FnOnce() -> C,
    C: IntoEffectful,
{
    Deferred {
        producer: Some(producer),
        inner: None,
    }
}

impl<F, C> Effectful for Deferred<F, C>
where
    F: FnOnce() -> C,
    C: IntoEffectful,
{
    fn advance(&mut self, resumption: Value) -> Result<Step, EffectError> {
        if let Some(producer) = self.producer.take() {
            self.inner = Some(producer().into_effectful());
        }
        match self.inner.as_mut() {
            Some(inner) => inner.advance(resumption),
            None => Err(EffectError::AlreadyCompleted),
        }
    }
}

impl<F, C> IntoEffectful for Deferred<F, C>
where
    F: FnOnce() -> C,
    C: IntoEffectful,
{
    type Computation = Self;

    fn into_effectful(self) -> Self {
        self
    }
}
