//! Tone of voice requested for a post.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Formal,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_round_trips_lowercase() {
        for tone in [Tone::Professional, Tone::Casual, Tone::Friendly, Tone::Formal] {
            let json = serde_json::to_string(&tone).unwrap();
            assert_eq!(json, format!("\"{}\"", tone.as_str()));
        }
    }

    #[test]
    fn test_unknown_tone_rejected() {
        assert!(serde_json::from_str::<Tone>("\"sarcastic\"").is_err());
        assert!(serde_json::from_str::<Tone>("\"Casual\"").is_err());
    }
}
