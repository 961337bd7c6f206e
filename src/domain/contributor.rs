use super::badge::{Badge, BadgeTag};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the contributor data file. Every field is optional: values of
/// the wrong JSON type, and empty strings, are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_badges", skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_badges<'de, D>(deserializer: D) -> Result<Vec<Badge>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

impl ContributorRecord {
    /// `addedAt` as a sort key; missing sorts as the empty string.
    pub fn added_at_key(&self) -> &str {
        self.added_at.as_deref().unwrap_or("")
    }

    pub fn name_key(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Name, falling back to username, used by the alphabetical orders.
    pub fn sort_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("")
    }

    /// Key of this contributor's appreciation bucket. Records without a
    /// username all share the empty key.
    pub fn appreciation_key(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Anonymous")
    }

    /// Name or username, for sentences about a contributor.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn handle(&self) -> String {
        self.username
            .as_deref()
            .map(|u| format!("@{}", u))
            .unwrap_or_default()
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(avatar) => avatar.clone(),
            None => format!(
                "https://avatars.githubusercontent.com/{}",
                self.username.as_deref().unwrap_or("")
            ),
        }
    }

    pub fn profile_url(&self) -> String {
        match (&self.github, &self.username) {
            (Some(github), _) => github.clone(),
            (None, Some(username)) => format!("https://github.com/{}", username),
            (None, None) => "#".to_string(),
        }
    }

    pub fn aria_label(&self) -> String {
        let who = self
            .name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("contributor");
        format!("Open {} on GitHub", who)
    }

    pub fn badge_tags(&self) -> impl Iterator<Item = BadgeTag> + '_ {
        self.badges.iter().filter_map(Badge::tag)
    }

    pub fn has_badge(&self, tag: BadgeTag) -> bool {
        self.badge_tags().any(|t| t == tag)
    }
}
