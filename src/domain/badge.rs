use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The fixed badge vocabulary a record may carry as a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTag {
    First,
    Core,
    Top,
    Helper,
    Early,
    Milestone,
}

impl BadgeTag {
    pub const ALL: [BadgeTag; 6] = [
        BadgeTag::First,
        BadgeTag::Core,
        BadgeTag::Top,
        BadgeTag::Helper,
        BadgeTag::Early,
        BadgeTag::Milestone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTag::First => "first",
            BadgeTag::Core => "core",
            BadgeTag::Top => "top",
            BadgeTag::Helper => "helper",
            BadgeTag::Early => "early",
            BadgeTag::Milestone => "milestone",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeTag::First => "🥇",
            BadgeTag::Core => "⭐",
            BadgeTag::Top => "🏆",
            BadgeTag::Helper => "🤝",
            BadgeTag::Early => "🌱",
            BadgeTag::Milestone => "🎯",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BadgeTag::First => "First",
            BadgeTag::Core => "Core Team",
            BadgeTag::Top => "Top Contributor",
            BadgeTag::Helper => "Helper",
            BadgeTag::Early => "Early Adopter",
            BadgeTag::Milestone => "Milestone",
        }
    }
}

impl fmt::Display for BadgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown badge '{}'", s))
    }
}

/// A badge as it appears in the data file: either a bare tag string or a
/// `{type, text, color}` object. Any other item is kept as `Other` so it still
/// counts towards "has a badge".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Badge {
    Tag(String),
    Custom(CustomBadge),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBadge {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Badge {
    /// The vocabulary tag, if this is a string badge naming one.
    /// Custom badges never resolve to a tag, whatever their text says.
    pub fn tag(&self) -> Option<BadgeTag> {
        match self {
            Badge::Tag(raw) => raw.parse().ok(),
            Badge::Custom(_) | Badge::Other(_) => None,
        }
    }

    /// Bucket key used when counting badges: the tag string itself, or the
    /// `type` field of a custom badge.
    pub fn kind_key(&self) -> Option<&str> {
        match self {
            Badge::Tag(raw) => Some(raw.as_str()),
            Badge::Custom(custom) => custom.kind.as_deref(),
            Badge::Other(_) => None,
        }
    }
}

/// Icon and label for a badge bucket key. Unknown keys get a generic medal
/// and their raw key as label.
pub fn badge_info(key: &str) -> (&'static str, String) {
    match key.parse::<BadgeTag>() {
        Ok(tag) => (tag.icon(), tag.label().to_string()),
        Err(_) => ("🏅", key.to_string()),
    }
}
