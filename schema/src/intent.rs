use serde::{Deserialize, Serialize};
use std::fmt;

/// A side's chosen action for one turn.
///
/// On the wire this is `{"kind": "attack"}` or `{"kind": "switch", "index": 1}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Intent {
    Attack,
    // The participant's position (0-4) in the roster. Signed on the wire so a
    // bad slot such as -1 still reaches the engine as a failed switch.
    Switch { index: i64 },
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Attack => write!(f, "attack"),
            Intent::Switch { index } => write!(f, "switch to slot {}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_shape() {
        let attack: Intent = serde_json::from_str(r#"{"kind":"attack"}"#).unwrap();
        assert_eq!(attack, Intent::Attack);

        let switch: Intent = serde_json::from_str(r#"{"kind":"switch","index":3}"#).unwrap();
        assert_eq!(switch, Intent::Switch { index: 3 });

        assert_eq!(
            serde_json::to_string(&Intent::Switch { index: 1 }).unwrap(),
            r#"{"kind":"switch","index":1}"#
        );
    }

    #[test]
    fn test_malformed_intents_are_rejected() {
        assert!(serde_json::from_str::<Intent>(r#"{"kind":"switch"}"#).is_err());
        assert!(serde_json::from_str::<Intent>(r#"{"kind":"flee"}"#).is_err());
        assert!(serde_json::from_str::<Intent>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<Intent>(r#"{"kind":"switch","index":"two"}"#).is_err());
    }

    #[test]
    fn test_negative_switch_index_is_well_formed() {
        let switch: Intent = serde_json::from_str(r#"{"kind":"switch","index":-1}"#).unwrap();
        assert_eq!(switch, Intent::Switch { index: -1 });
    }
}
