//! One-shot handle tactics.
//!
//! An operation-shaped handler entry receives a `Tactics` token bound to the
//! specific action occurrence it is handling. Exactly one of `resume` or
//! `abort` may be invoked, exactly once; the token is guarded by an explicit
//! state cell and reports a second use as [`EffectError::DoubleTactic`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::action::Action;
use crate::error::EffectError;
use crate::ids::DispatchId;
use crate::value::Value;

/// Which tactic a handler invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticKind {
    Resume,
    Abort,
}

impl fmt::Display for TacticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacticKind::Resume => f.write_str("resume"),
            TacticKind::Abort => f.write_str("abort"),
        }
    }
}

/// The settled outcome of a tactic invocation, taken by the dispatch loop.
#[derive(Debug)]
pub(crate) enum Resolution {
    Resumed(Value),
    Aborted(Value),
}

#[derive(Debug)]
enum Slot {
    Pending,
    Settled { kind: TacticKind, value: Value },
    Consumed { kind: TacticKind },
}

/// One-shot resume/abort pair bound to a single action occurrence.
///
/// Cloneable so a handler may stash it inside a nested computation's
/// closures; all clones share the same one-shot state.
#[derive(Clone)]
pub struct Tactics {
    slot: Rc<RefCell<Slot>>,
    effect: String,
    op: String,
    dispatch: DispatchId,
}

impl Tactics {
    /// Bind fresh tactics to an action occurrence.
    pub(crate) fn bind(action: &Action, dispatch: DispatchId) -> Self {
        Tactics {
            slot: Rc::new(RefCell::new(Slot::Pending)),
            effect: action.effect.clone(),
            op: action.op.clone(),
            dispatch,
        }
    }

    /// Hand `value` back into the suspended computation.
    pub fn resume(&self, value: impl Into<Value>) -> Result<(), EffectError> {
        self.settle(TacticKind::Resume, value.into())
    }

    /// Terminate the handling early; the whole handling completes with `value`.
    pub fn abort(&self, value: impl Into<Value>) -> Result<(), EffectError> {
        self.settle(TacticKind::Abort, value.into())
    }

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn dispatch_id(&self) -> DispatchId {
        self.dispatch
    }

    fn settle(&self, kind: TacticKind, value: Value) -> Result<(), EffectError> {
        let mut slot = self.slot.borrow_mut();
        match &*slot {
            Slot::Pending => {
                trace!(
                    dispatch = self.dispatch.raw(),
                    effect = %self.effect,
                    op = %self.op,
                    tactic = %kind,
                    "tactic invoked"
                );
                *slot = Slot::Settled { kind, value };
                Ok(())
            }
            Slot::Settled { kind: first, .. } | Slot::Consumed { kind: first } => Err(
                EffectError::double_tactic(self.effect.as_str(), self.op.as_str(), *first, kind),
            ),
        }
    }

    /// Take the settled resolution, leaving the slot inert.
    ///
    /// Returns None while the slot is still pending (or after a prior take).
    pub(crate) fn take_resolution(&self) -> Option<Resolution> {
        let mut slot = self.slot.borrow_mut();
        match std::mem::replace(&mut *slot, Slot::Pending) {
            Slot::Pending => None,
            Slot::Settled { kind, value } => {
                *slot = Slot::Consumed { kind };
                match kind {
                    TacticKind::Resume => Some(Resolution::Resumed(value)),
                    TacticKind::Abort => Some(Resolution::Aborted(value)),
                }
            }
            Slot::Consumed { kind } => {
                *slot = Slot::Consumed { kind };
                None
            }
        }
    }
}

impl fmt::Debug for Tactics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tactics")
            .field("effect", &self.effect)
            .field("op", &self.op)
            .field("dispatch", &self.dispatch)
            .finish()
    }
}
