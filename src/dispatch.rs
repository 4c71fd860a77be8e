//! The `handle` dispatch loop.
//!
//! `handle(computation, table)` returns a new computation whose observable
//! suspensions are exactly the actions the table does not claim. Matched
//! value-shaped entries resume the source immediately; matched
//! operation-shaped entries get one-shot tactics and may return a nested
//! computation that is driven depth-first, with its own suspensions forwarded
//! outward. `abort` stops the source permanently and completes the handling
//! with the aborted value.

use tracing::trace;

use crate::computation::{Effectful, IntoEffectful, Step};
use crate::error::EffectError;
use crate::handler::{Entry, Handlers};
use crate::ids::DispatchId;
use crate::program::Running;
use crate::tactics::{Resolution, Tactics};
use crate::value::Value;

/// Resolve a computation's effects against a handler table.
///
/// The returned [`Handled`] computation owns the input for its lifetime and
/// represents "the original, modulo effects already resolved"; handling
/// composes by nesting `handle` calls.
pub fn handle<C>(computation: C, handlers: Handlers) -> Handled
where
    C: IntoEffectful,
    C::Computation: 'static,
{
    Handled {
        source: Box::new(computation.into_effectful()),
        table: handlers,
        state: State::Driving,
    }
}

enum State {
    /// The next resumption value feeds the source computation.
    Driving,
    /// A matched handler returned a nested computation; drive it to
    /// completion first. Its suspensions forward out; the next resumption
    /// value feeds the body.
    Nested { body: Running, tactics: Tactics },
    Finished,
}

/// The computation returned by [`handle`].
pub struct Handled {
    source: Box<dyn Effectful>,
    table: Handlers,
    state: State,
}

impl std::fmt::Debug for Handled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Driving => "Driving",
            State::Nested { .. } => "Nested",
            State::Finished => "Finished",
        };
        f.debug_struct("Handled").field("state", &state).finish()
    }
}

impl Effectful for Handled {
    fn advance(&mut self, resumption: Value) -> Result<Step, EffectError> {
        let mut feed = resumption;
        loop {
            match &mut self.state {
                State::Finished => return Err(EffectError::AlreadyCompleted),

                State::Nested { body, tactics } => {
                    match body.advance(std::mem::replace(&mut feed, Value::Unit))? {
                        Step::Suspended(action) => {
                            // Handler-body effects are outer-table-visible
                            // only: forwarded without consulting this table.
                            trace!(
                                effect = %action.effect,
                                op = %action.op,
                                "forwarding nested handler-body action"
                            );
                            return Ok(Step::Suspended(action));
                        }
                        Step::Completed(_) => {
                            // The nested computation's own result is discarded;
                            // only an explicit tactic advances the source.
                            let tactics = tactics.clone();
                            self.state = State::Driving;
                            match tactics.take_resolution() {
                                Some(Resolution::Resumed(value)) => feed = value,
                                Some(Resolution::Aborted(value)) => {
                                    self.state = State::Finished;
                                    return Ok(Step::Completed(value));
                                }
                                None => {
                                    self.state = State::Finished;
                                    return Err(EffectError::tactic_never_invoked(
                                        tactics.effect(),
                                        tactics.op(),
                                    ));
                                }
                            }
                        }
                    }
                }

                State::Driving => {
                    match self.source.advance(std::mem::replace(&mut feed, Value::Unit))? {
                        Step::Completed(value) => {
                            self.state = State::Finished;
                            return Ok(Step::Completed(value));
                        }
                        Step::Suspended(action) => {
                            let entry = match self.table.lookup(&action) {
                                Some(entry) => entry.clone(),
                                None => {
                                    trace!(
                                        effect = %action.effect,
                                        op = %action.op,
                                        "forwarding unhandled action"
                                    );
                                    return Ok(Step::Suspended(action));
                                }
                            };
                            match entry {
                                Entry::Value(value) => {
                                    trace!(
                                        effect = %action.effect,
                                        op = %action.op,
                                        "resuming with value-shaped entry"
                                    );
                                    feed = value;
                                }
                                Entry::Func(handler) => {
                                    let dispatch = DispatchId::fresh();
                                    let tactics = Tactics::bind(&action, dispatch);
                                    trace!(
                                        dispatch = dispatch.raw(),
                                        effect = %action.effect,
                                        op = %action.op,
                                        "dispatching action"
                                    );
                                    match handler(action.args, tactics.clone())? {
                                        Some(program) => {
                                            trace!(
                                                dispatch = dispatch.raw(),
                                                "driving nested handler computation"
                                            );
                                            self.state = State::Nested {
                                                body: Running::new(program),
                                                tactics,
                                            };
                                        }
                                        None => match tactics.take_resolution() {
                                            Some(Resolution::Resumed(value)) => feed = value,
                                            Some(Resolution::Aborted(value)) => {
                                                trace!(
                                                    dispatch = dispatch.raw(),
                                                    "handler aborted; completing"
                                                );
                                                self.state = State::Finished;
                                                return Ok(Step::Completed(value));
                                            }
                                            None => {
                                                self.state = State::Finished;
                                                return Err(EffectError::tactic_never_invoked(
                                                    tactics.effect(),
                                                    tactics.op(),
                                                ));
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

impl IntoEffectful for Handled {
    type Computation = Handled;

    fn into_effectful(self) -> Handled {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::program::Program;

    fn perform(effect: &str, op: &str) -> Program {
        Program::perform(Action::new(effect, op, vec![]))
    }

    #[test]
    fn test_value_entry_resumes_without_suspending() {
        let table = Handlers::new().value("Env", "home", "/root");
        let mut handled = handle(perform("Env", "home"), table);
        match handled.advance(Value::Unit) {
            Ok(Step::Completed(Value::Str(s))) => assert_eq!(s, "/root"),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_func_entry_receives_parameters() {
        let table = Handlers::new().on("Math", "add", |args, tactics| {
            let sum: i64 = args.iter().filter_map(Value::as_int).sum();
            tactics.resume(Value::Int(sum))?;
            Ok(None)
        });
        let program = Program::perform(Action::new(
            "Math",
            "add",
            vec![Value::Int(2), Value::Int(3)],
        ));
        let mut handled = handle(program, table);
        assert!(matches!(
            handled.advance(Value::Unit),
            Ok(Step::Completed(Value::Int(5)))
        ));
    }

    #[test]
    fn test_unmatched_action_is_forwarded() {
        let mut handled = handle(perform("IO", "read"), Handlers::new());
        match handled.advance(Value::Unit) {
            Ok(Step::Suspended(a)) => {
                assert_eq!(a.effect, "IO");
                assert_eq!(a.op, "read");
            }
            other => panic!("expected forwarded suspension, got {:?}", other),
        }
        // The consumer's resumption value reaches the source computation.
        assert!(matches!(
            handled.advance(Value::Int(11)),
            Ok(Step::Completed(Value::Int(11)))
        ));
    }

    #[test]
    fn test_abort_completes_with_substitute_value() {
        let table = Handlers::new().on("Exn", "throw", |_args, tactics| {
            tactics.abort("bang")?;
            Ok(None)
        });
        let program = perform("Exn", "throw").and_then(|_| perform("Never", "reached"));
        let mut handled = handle(program, table);
        match handled.advance(Value::Unit) {
            Ok(Step::Completed(Value::Str(s))) => assert_eq!(s, "bang"),
            other => panic!("expected aborted completion, got {:?}", other),
        }
        assert_eq!(
            handled.advance(Value::Unit).unwrap_err(),
            EffectError::AlreadyCompleted
        );
    }

    #[test]
    fn test_missing_tactic_is_fatal() {
        let table = Handlers::new().on("Quiet", "noop", |_args, _tactics| Ok(None));
        let mut handled = handle(perform("Quiet", "noop"), table);
        assert_eq!(
            handled.advance(Value::Unit).unwrap_err(),
            EffectError::tactic_never_invoked("Quiet", "noop")
        );
    }
}
