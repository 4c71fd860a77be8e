//! Top-level drivers.
//!
//! A correctly composed program discharges every effect before being driven
//! here: [`run`] treats any surviving suspension as a caller contract
//! violation. [`run_with`] instead lets an external collaborator sitting
//! above the outermost `handle` resolve whatever actions reach the top.

use tracing::trace;

use crate::action::Action;
use crate::computation::{Effectful, IntoEffectful, Step};
use crate::error::EffectError;
use crate::value::Value;

/// Drive a fully-handled computation to completion.
pub fn run<C>(computation: C) -> Result<Value, EffectError>
where
    C: IntoEffectful,
{
    let mut computation = computation.into_effectful();
    match computation.advance(Value::Unit)? {
        Step::Completed(value) => Ok(value),
        Step::Suspended(action) => Err(EffectError::unhandled(&action)),
    }
}

/// Drive a computation to completion, resolving leftover actions with
/// `resolver`. The resolver's value becomes the suspension's resumption.
pub fn run_with<C, F>(computation: C, mut resolver: F) -> Result<Value, EffectError>
where
    C: IntoEffectful,
    F: FnMut(&Action) -> Result<Value, EffectError>,
{
    let mut computation = computation.into_effectful();
    let mut feed = Value::Unit;
    loop {
        match computation.advance(feed)? {
            Step::Completed(value) => return Ok(value),
            Step::Suspended(action) => {
                trace!(
                    effect = %action.effect,
                    op = %action.op,
                    "resolving top-level action"
                );
                feed = resolver(&action)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handle;
    use crate::handler::Handlers;
    use crate::program::Program;

    fn perform(effect: &str, op: &str) -> Program {
        Program::perform(Action::new(effect, op, vec![]))
    }

    #[test]
    fn test_run_completes_fully_handled_computation() {
        let table = Handlers::new().value("Env", "user", "ada");
        let result = run(handle(perform("Env", "user"), table)).unwrap();
        assert_eq!(result, Value::Str("ada".into()));
    }

    #[test]
    fn test_run_rejects_surviving_suspension() {
        let err = run(perform("IO", "read")).unwrap_err();
        assert_eq!(
            err,
            EffectError::UnhandledEffect {
                effect: "IO".into(),
                op: "read".into(),
            }
        );
    }

    #[test]
    fn test_run_with_resolves_leftover_actions() {
        let program = perform("Ask", "name")
            .and_then(|name| {
                perform("Ask", "punct").map(move |punct| {
                    let s = format!(
                        "{}{}",
                        name.as_str().unwrap_or_default(),
                        punct.as_str().unwrap_or_default()
                    );
                    Value::Str(s)
                })
            });

        let result = run_with(program, |action| {
            Ok(match action.op.as_str() {
                "name" => Value::from("world"),
                _ => Value::from("!"),
            })
        })
        .unwrap();
        assert_eq!(result, Value::Str("world!".into()));
    }

    #[test]
    fn test_run_with_propagates_resolver_errors() {
        let err = run_with(perform("IO", "read"), |action| {
            Err(EffectError::unhandled(action))
        })
        .unwrap_err();
        assert!(matches!(err, EffectError::UnhandledEffect { .. }));
    }
}
