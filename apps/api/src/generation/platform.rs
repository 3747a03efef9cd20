//! Target platforms and their static content limits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Social platform a post is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    Instagram,
    #[default]
    Linkedin,
}

/// Per-platform limits used to parameterize prompts. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSpec {
    pub max_length: u32,
    pub style_hint: &'static str,
}

const X_SPEC: PlatformSpec = PlatformSpec {
    max_length: 280,
    style_hint: "concise and engaging",
};

const INSTAGRAM_SPEC: PlatformSpec = PlatformSpec {
    max_length: 2200,
    style_hint: "visual and engaging",
};

const LINKEDIN_SPEC: PlatformSpec = PlatformSpec {
    max_length: 3000,
    style_hint: "professional and detailed",
};

impl Platform {
    pub fn spec(&self) -> &'static PlatformSpec {
        match self {
            Platform::X => &X_SPEC,
            Platform::Instagram => &INSTAGRAM_SPEC,
            Platform::Linkedin => &LINKEDIN_SPEC,
        }
    }

    /// Wire name, as used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::X => "x",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    /// How hashtag-heavy posts on this platform usually are.
    pub fn hashtag_convention(&self) -> &'static str {
        match self {
            Platform::X => {
                "On x, hashtags eat into the character limit, so prefer short tags with high search volume."
            }
            Platform::Instagram => {
                "On instagram, hashtags drive discovery, so blend high-volume tags with niche community tags."
            }
            Platform::Linkedin => {
                "On linkedin, favor professional, industry-level tags over trending slang."
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
