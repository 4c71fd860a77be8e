//! Effect constructors.
//!
//! An [`Effect`] pre-builds a mapping from operation name to an [`Op`] action
//! creator once at definition time. Each `Op` builds a computation that
//! suspends with exactly one [`Action`] and completes with the resumption
//! value. Declaration is a construction-time convenience only: the runtime
//! dispatches on raw action names and accepts any of them.

use std::collections::HashMap;

use crate::action::Action;
use crate::error::EffectError;
use crate::program::Program;
use crate::value::Value;

/// Action creator for one operation of a named effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Op {
    effect: String,
    name: String,
}

impl Op {
    /// Create a free-standing action creator. No declaration required.
    pub fn new(effect: impl Into<String>, name: impl Into<String>) -> Self {
        Op {
            effect: effect.into(),
            name: name.into(),
        }
    }

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the action record without wrapping it in a computation.
    pub fn action(&self, args: Vec<Value>) -> Action {
        Action::new(&self.effect, &self.name, args)
    }

    /// Operation-shaped creator: a computation that suspends with the action
    /// and completes with the supplied resumption value.
    pub fn call(&self, args: Vec<Value>) -> Program {
        Program::perform(self.action(args))
    }

    /// Value-shaped creator: same as [`call`](Op::call) with no parameters.
    pub fn request(&self) -> Program {
        self.call(Vec::new())
    }
}

/// A named effect with its operations' action creators, built once.
#[derive(Debug, Clone)]
pub struct Effect {
    name: String,
    ops: HashMap<String, Op>,
}

impl Effect {
    pub fn builder(name: impl Into<String>) -> EffectBuilder {
        EffectBuilder {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the action creator for a declared operation.
    pub fn op(&self, name: &str) -> Option<&Op> {
        self.ops.get(name)
    }

    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.ops.values()
    }
}

/// Builder collecting operation names for one effect.
#[derive(Debug, Clone)]
pub struct EffectBuilder {
    name: String,
    ops: Vec<String>,
}

impl EffectBuilder {
    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.ops.push(name.into());
        self
    }

    /// Build the effect. Operation names within one effect must be unique.
    pub fn build(self) -> Result<Effect, EffectError> {
        let mut ops = HashMap::with_capacity(self.ops.len());
        for op_name in self.ops {
            if ops.contains_key(&op_name) {
                return Err(EffectError::duplicate_operation(&self.name, &op_name));
            }
            let op = Op::new(&self.name, &op_name);
            ops.insert(op_name, op);
        }
        Ok(Effect {
            name: self.name,
            ops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creates_ops() {
        let console = Effect::builder("Console")
            .operation("readLine")
            .operation("writeLine")
            .build()
            .unwrap();

        assert_eq!(console.name(), "Console");
        let read = console.op("readLine").unwrap();
        assert_eq!(read.effect(), "Console");
        assert_eq!(read.name(), "readLine");
        assert!(console.op("missing").is_none());
        assert_eq!(console.ops().count(), 2);
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let err = Effect::builder("Console")
            .operation("readLine")
            .operation("readLine")
            .build()
            .unwrap_err();
        assert_eq!(err, EffectError::duplicate_operation("Console", "readLine"));
    }

    #[test]
    fn test_op_builds_action_with_parameters() {
        let op = Op::new("Console", "writeLine");
        let action = op.action(vec![Value::from("hi")]);
        assert_eq!(action.effect, "Console");
        assert_eq!(action.op, "writeLine");
        assert_eq!(action.args, vec![Value::Str("hi".into())]);
    }

    #[test]
    fn test_request_carries_no_parameters() {
        let op = Op::new("Console", "readLine");
        assert!(op.action(vec![]).args.is_empty());
        assert!(matches!(op.request(), Program::Perform(a) if a.args.is_empty()));
    }

    #[test]
    fn test_undeclared_ops_are_still_constructible() {
        // Conformance to a declaration is not enforced at runtime.
        let op = Op::new("Nowhere", "declared");
        assert_eq!(op.action(vec![]).effect, "Nowhere");
    }
}
