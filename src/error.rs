//! Error types for the effect runtime.
//!
//! Fatal handler-contract violations surface here, synchronously, from the
//! `advance` call that exposed them. None of them are recoverable by the core.

use thiserror::Error;

use crate::action::Action;
use crate::tactics::TacticKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    /// A handler entry invoked a second tactic for one action occurrence.
    #[error("{second} called for {effect}.{op} after {first} already consumed the continuation")]
    DoubleTactic {
        effect: String,
        op: String,
        first: TacticKind,
        second: TacticKind,
    },

    /// A handler entry settled (its body returned and any nested computation
    /// completed) without ever invoking a tactic.
    #[error("handler for {effect}.{op} returned without calling resume or abort")]
    TacticNeverInvoked { effect: String, op: String },

    /// An action reached the top-level driver with no handler left to claim it.
    #[error("unhandled effect: {effect}.{op}")]
    UnhandledEffect { effect: String, op: String },

    /// A terminal computation was driven again.
    #[error("computation already completed; it must not be driven again")]
    AlreadyCompleted,

    /// An effect declaration listed the same operation name twice.
    #[error("duplicate operation {op:?} in effect {effect:?}")]
    DuplicateOperation { effect: String, op: String },
}

impl EffectError {
    pub fn double_tactic(
        effect: impl Into<String>,
        op: impl Into<String>,
        first: TacticKind,
        second: TacticKind,
    ) -> Self {
        EffectError::DoubleTactic {
            effect: effect.into(),
            op: op.into(),
            first,
            second,
        }
    }

    pub fn tactic_never_invoked(effect: impl Into<String>, op: impl Into<String>) -> Self {
        EffectError::TacticNeverInvoked {
            effect: effect.into(),
            op: op.into(),
        }
    }

    pub fn unhandled(action: &Action) -> Self {
        EffectError::UnhandledEffect {
            effect: action.effect.clone(),
            op: action.op.clone(),
        }
    }

    pub fn duplicate_operation(effect: impl Into<String>, op: impl Into<String>) -> Self {
        EffectError::DuplicateOperation {
            effect: effect.into(),
            op: op.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_error_display() {
        let err = EffectError::double_tactic("Console", "readLine", TacticKind::Resume, TacticKind::Abort);
        assert_eq!(
            err.to_string(),
            "abort called for Console.readLine after resume already consumed the continuation"
        );

        let err = EffectError::tactic_never_invoked("State", "get");
        assert!(err.to_string().contains("State.get"));

        let err = EffectError::unhandled(&Action::new("IO", "read", vec![Value::Unit]));
        assert_eq!(err.to_string(), "unhandled effect: IO.read");
    }

    #[test]
    fn test_already_completed_display() {
        assert!(EffectError::AlreadyCompleted
            .to_string()
            .contains("must not be driven again"));
    }
}
