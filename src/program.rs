//! Effectful computation bodies and their step machine.
//!
//! A [`Program`] is the user-authored description of a computation: a value,
//! a performed action, or a sequencing of a source program with a
//! continuation closure. [`Running`] drives a program with a mode-based step
//! machine over an explicit frame stack, suspending exactly when a
//! `Perform` is reached and resuming with exactly one value.

use std::fmt;

use crate::action::Action;
use crate::computation::{Effectful, IntoEffectful, Step};
use crate::error::EffectError;
use crate::value::Value;

/// Continuation closure run with the source program's delivered value.
pub type Binder = Box<dyn FnOnce(Value) -> Result<Program, EffectError>>;

/// Pure transformation of a delivered value.
pub type Mapper = Box<dyn FnOnce(Value) -> Value>;

/// A suspendable computation body.
pub enum Program {
    /// Complete immediately with a value.
    Pure(Value),
    /// Suspend with one action; complete with the supplied resumption value.
    Perform(Action),
    /// Run `source`, then feed its result to `binder` and run what it builds.
    AndThen { source: Box<Program>, binder: Binder },
    /// Run `source`, then transform its result.
    Map { source: Box<Program>, mapper: Mapper },
}

impl Program {
    pub fn pure(value: impl Into<Value>) -> Self {
        Program::Pure(value.into())
    }

    /// A computation that suspends once with `action` and completes with
    /// whatever resumption value is supplied.
    pub fn perform(action: Action) -> Self {
        Program::Perform(action)
    }

    /// Sequence: the resumption-carrying result of `self` becomes the input
    /// of `binder`.
    pub fn and_then(self, binder: impl FnOnce(Value) -> Program + 'static) -> Self {
        self.and_then_try(move |value| Ok(binder(value)))
    }

    /// Fallible sequencing; lets a continuation propagate tactic errors from
    /// inside a handler body.
    pub fn and_then_try(
        self,
        binder: impl FnOnce(Value) -> Result<Program, EffectError> + 'static,
    ) -> Self {
        Program::AndThen {
            source: Box::new(self),
            binder: Box::new(binder),
        }
    }

    pub fn map(self, mapper: impl FnOnce(Value) -> Value + 'static) -> Self {
        Program::Map {
            source: Box::new(self),
            mapper: Box::new(mapper),
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Pure(value) => f.debug_tuple("Pure").field(value).finish(),
            Program::Perform(action) => f.debug_tuple("Perform").field(action).finish(),
            Program::AndThen { source, .. } => {
                f.debug_struct("AndThen").field("source", source).finish()
            }
            Program::Map { source, .. } => f.debug_struct("Map").field("source", source).finish(),
        }
    }
}

enum Frame {
    Bind(Binder),
    Map(Mapper),
}

enum Mode {
    Eval(Program),
    Deliver(Value),
    Suspended,
    Finished,
}

/// Step machine driving one [`Program`].
pub struct Running {
    mode: Mode,
    frames: Vec<Frame>,
}

impl Running {
    pub fn new(program: Program) -> Self {
        Running {
            mode: Mode::Eval(program),
            frames: Vec::new(),
        }
    }
}

impl fmt::Debug for Running {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match &self.mode {
            Mode::Eval(_) => "Eval",
            Mode::Deliver(_) => "Deliver",
            Mode::Suspended => "Suspended",
            Mode::Finished => "Finished",
        };
        f.debug_struct("Running")
            .field("mode", &mode)
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl Effectful for Running {
    fn advance(&mut self, resumption: Value) -> Result<Step, EffectError> {
        match std::mem::replace(&mut self.mode, Mode::Finished) {
            Mode::Finished => return Err(EffectError::AlreadyCompleted),
            Mode::Suspended => self.mode = Mode::Deliver(resumption),
            // A fresh computation ignores the resumption value.
            fresh => self.mode = fresh,
        }

        loop {
            match std::mem::replace(&mut self.mode, Mode::Finished) {
                Mode::Eval(program) => match program {
                    Program::Pure(value) => self.mode = Mode::Deliver(value),
                    Program::Perform(action) => {
                        self.mode = Mode::Suspended;
                        return Ok(Step::Suspended(action));
                    }
                    Program::AndThen { source, binder } => {
                        self.frames.push(Frame::Bind(binder));
                        self.mode = Mode::Eval(*source);
                    }
                    Program::Map { source, mapper } => {
                        self.frames.push(Frame::Map(mapper));
                        self.mode = Mode::Eval(*source);
                    }
                },
                Mode::Deliver(value) => match self.frames.pop() {
                    None => return Ok(Step::Completed(value)),
                    Some(Frame::Bind(binder)) => self.mode = Mode::Eval(binder(value)?),
                    Some(Frame::Map(mapper)) => self.mode = Mode::Deliver(mapper(value)),
                },
                Mode::Suspended | Mode::Finished => return Err(EffectError::AlreadyCompleted),
            }
        }
    }
}

impl IntoEffectful for Program {
    type Computation = Running;

    fn into_effectful(self) -> Running {
        Running::new(self)
    }
}

impl IntoEffectful for Running {
    type Computation = Running;

    fn into_effectful(self) -> Running {
        self
    }
}

impl IntoEffectful for Action {
    type Computation = Running;

    fn into_effectful(self) -> Running {
        Running::new(Program::perform(self))
    }
}
