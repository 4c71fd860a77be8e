//! Handler tables.
//!
//! A [`Handlers`] table maps (effect name, operation name) to a handler
//! entry: either a plain value to resume with, or a function receiving the
//! action's arguments plus one-shot [`Tactics`]. Tables are partial and
//! last-write-wins; they are read-only once passed to
//! [`handle`](crate::dispatch::handle).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::action::Action;
use crate::computation::IntoEffectful;
use crate::dispatch::{handle, Handled};
use crate::error::EffectError;
use crate::program::Program;
use crate::tactics::Tactics;
use crate::value::Value;

/// Operation-shaped handler function.
///
/// Receives the action's arguments and tactics bound to that occurrence; may
/// return a nested computation to drive before the outer one is resumed.
pub type HandlerFn = Rc<dyn Fn(Vec<Value>, Tactics) -> Result<Option<Program>, EffectError>>;

/// One handler table entry. The entry's shape is the sole discriminator
/// between value-shaped and operation-shaped handling.
#[derive(Clone)]
pub enum Entry {
    /// Resume immediately with this value.
    Value(Value),
    /// Invoke with the action's arguments plus fresh tactics.
    Func(HandlerFn),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Entry::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Partial mapping from (effect name, operation name) to handler entries.
#[derive(Clone, Debug, Default)]
pub struct Handlers {
    table: HashMap<String, HashMap<String, Entry>>,
}

impl Handlers {
    pub fn new() -> Self {
        Handlers::default()
    }

    /// Register a value-shaped entry.
    pub fn value(
        mut self,
        effect: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(effect, op, Entry::Value(value.into()));
        self
    }

    /// Register an operation-shaped entry.
    pub fn on<F>(mut self, effect: impl Into<String>, op: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<Value>, Tactics) -> Result<Option<Program>, EffectError> + 'static,
    {
        self.insert(effect, op, Entry::Func(Rc::new(handler)));
        self
    }

    /// Insert an entry; a later write for the same key wins.
    pub fn insert(&mut self, effect: impl Into<String>, op: impl Into<String>, entry: Entry) {
        self.table
            .entry(effect.into())
            .or_default()
            .insert(op.into(), entry);
    }

    /// Merge another table over this one; `other`'s entries win on collision.
    pub fn merge(mut self, other: Handlers) -> Self {
        for (effect, ops) in other.table {
            let slot = self.table.entry(effect).or_default();
            for (op, entry) in ops {
                slot.insert(op, entry);
            }
        }
        self
    }

    /// Two-level key lookup for one action.
    pub fn lookup(&self, action: &Action) -> Option<&Entry> {
        self.table.get(&action.effect)?.get(&action.op)
    }

    pub fn is_empty(&self) -> bool {
        self.table.values().all(|ops| ops.is_empty())
    }

    /// Symmetric form of [`handle`]: `table.handle(computation)`.
    pub fn handle<C>(self, computation: C) -> Handled
    where
        C: IntoEffectful,
        C::Computation: 'static,
    {
        handle(computation, self)
    }
}
