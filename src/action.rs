//! Actions: inert records describing one requested effect.
//!
//! An Action names an effect, an operation within it, and the argument
//! values. It is immutable once created, owned by whichever component is
//! currently holding the suspension, and discarded once resolved.

use crate::value::Value;

/// One requested effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// The effect this action belongs to.
    pub effect: String,
    /// The operation (constructor) name within the effect.
    pub op: String,
    /// Argument values, in call order.
    pub args: Vec<Value>,
}

impl Action {
    /// Create an action. The runtime accepts any effect/operation names;
    /// conformance to a declared effect is a construction-time concern of
    /// [`Effect`](crate::effect::Effect).
    pub fn new(effect: impl Into<String>, op: impl Into<String>, args: Vec<Value>) -> Self {
        Action {
            effect: effect.into(),
            op: op.into(),
            args,
        }
    }

    /// Create an action with no arguments (value-shaped requests).
    pub fn nullary(effect: impl Into<String>, op: impl Into<String>) -> Self {
        Action::new(effect, op, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_construction() {
        let a = Action::new("Console", "writeLine", vec![Value::from("hi")]);
        assert_eq!(a.effect, "Console");
        assert_eq!(a.op, "writeLine");
        assert_eq!(a.args, vec![Value::Str("hi".into())]);
    }

    #[test]
    fn test_nullary_action_has_no_args() {
        let a = Action::nullary("Console", "readLine");
        assert!(a.args.is_empty());
    }
}
