//! The correctness × emotion pacing table.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_EMOTION: &str = "neutral";

/// The learner's last reported emotional state.
///
/// Any label is accepted; labels outside the known set are kept verbatim as
/// `Other` and fall into the table's fallback branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Engaged,
    Confused,
    Other(String),
}

impl From<&str> for Emotion {
    fn from(label: &str) -> Self {
        match label {
            "neutral" => Emotion::Neutral,
            "happy" => Emotion::Happy,
            "engaged" => Emotion::Engaged,
            "confused" => Emotion::Confused,
            other => Emotion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emotion::Neutral => write!(f, "neutral"),
            Emotion::Happy => write!(f, "happy"),
            Emotion::Engaged => write!(f, "engaged"),
            Emotion::Confused => write!(f, "confused"),
            Emotion::Other(label) => write!(f, "{}", label),
        }
    }
}

impl Serialize for Emotion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Emotion::from(label.as_str()))
    }
}

/// The decision recorded after an answer and applied by the next content request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Advance,
    RepeatSimpler,
    Repeat,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAction::Advance => write!(f, "advance"),
            NextAction::RepeatSimpler => write!(f, "repeat_simpler"),
            NextAction::Repeat => write!(f, "repeat"),
        }
    }
}

/// Applies the pacing table.
///
/// | correct | emotion                   | action           |
/// |---------|---------------------------|------------------|
/// | yes     | happy / neutral / engaged | `Advance`        |
/// | yes     | confused                  | `RepeatSimpler`  |
/// | yes     | anything else             | `Advance`        |
/// | no      | any                       | `Repeat`         |
pub fn decide(correct: bool, emotion: &Emotion) -> NextAction {
    if !correct {
        return NextAction::Repeat;
    }
    match emotion {
        Emotion::Confused => NextAction::RepeatSimpler,
        Emotion::Happy | Emotion::Neutral | Emotion::Engaged | Emotion::Other(_) => {
            NextAction::Advance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table_is_exhaustive() {
        let cases = [
            (true, "happy", NextAction::Advance),
            (true, "neutral", NextAction::Advance),
            (true, "engaged", NextAction::Advance),
            (true, "confused", NextAction::RepeatSimpler),
            (true, "sleepy", NextAction::Advance),
            (false, "happy", NextAction::Repeat),
            (false, "neutral", NextAction::Repeat),
            (false, "engaged", NextAction::Repeat),
            (false, "confused", NextAction::Repeat),
            (false, "sleepy", NextAction::Repeat),
        ];
        for (correct, label, expected) in cases {
            assert_eq!(
                decide(correct, &Emotion::from(label)),
                expected,
                "correct={correct} emotion={label}"
            );
        }
    }

    #[test]
    fn test_emotion_labels_are_kept_verbatim() {
        assert_eq!(Emotion::from("Happy"), Emotion::Other("Happy".to_string()));
        assert_eq!(Emotion::from("Happy").to_string(), "Happy");
        assert_eq!(Emotion::default().to_string(), DEFAULT_EMOTION);

        let json = serde_json::to_string(&Emotion::Confused).unwrap();
        assert_eq!(json, "\"confused\"");
        let parsed: Emotion = serde_json::from_str("\"bored\"").unwrap();
        assert_eq!(parsed, Emotion::Other("bored".to_string()));
    }

    #[test]
    fn test_next_action_wire_names() {
        assert_eq!(serde_json::to_string(&NextAction::RepeatSimpler).unwrap(), "\"repeat_simpler\"");
        assert_eq!(NextAction::Advance.to_string(), "advance");
    }
}
