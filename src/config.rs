//! Session configuration
//!
//! Handed over from JavaScript as a plain object; every field is optional and
//! falls back to 4/4, treble clef, C major and 100 undo steps.

use serde::{Deserialize, Serialize};

use crate::errors::NotationError;
use crate::ir::Clef;
use crate::models::{KeySignature, TimeSignature};

fn default_history_limit() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub time_signature: TimeSignature,
    #[serde(default)]
    pub clef: Clef,
    #[serde(default)]
    pub key_signature: KeySignature,
    /// Maximum number of undo steps kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_signature: TimeSignature::default(),
            clef: Clef::default(),
            key_signature: KeySignature::default(),
            history_limit: default_history_limit(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), NotationError> {
        self.time_signature.validate()?;
        if self.history_limit == 0 {
            return Err(NotationError::InvalidConfig(
                "historyLimit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, NoteName};

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.time_signature, TimeSignature::new(4, Duration::Quarter).unwrap());
        assert_eq!(config.clef, Clef::Treble);
        assert_eq!(config.history_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_object_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"timeSignature": "6/8", "keySignature": "Bb"}"#).unwrap();
        assert_eq!(config.time_signature, TimeSignature::new(6, Duration::Eighth).unwrap());
        assert_eq!(config.key_signature, KeySignature::major(NoteName::Bb).unwrap());
        assert_eq!(config.clef, Clef::Treble);
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_invalid_values() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{"timeSignature": "0/4"}"#).is_err());
        assert!(serde_json::from_str::<EngineConfig>(r#"{"clef": "soprano"}"#).is_err());

        let config = EngineConfig { history_limit: 0, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(NotationError::InvalidConfig(_))));
    }
}
