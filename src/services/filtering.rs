use crate::domain::{BadgeTag, ContributorRecord};
use crate::utils::plural;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeFilter {
    #[default]
    All,
    Tag(BadgeTag),
}

impl BadgeFilter {
    /// `"all"` or a vocabulary tag; anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        if value == "all" {
            Some(BadgeFilter::All)
        } else {
            value.parse().ok().map(BadgeFilter::Tag)
        }
    }
}

impl fmt::Display for BadgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeFilter::All => f.write_str("all"),
            BadgeFilter::Tag(tag) => f.write_str(tag.as_str()),
        }
    }
}

impl Serialize for BadgeFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Search box and badge button state. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub active_badge: BadgeFilter,
}

impl FilterState {
    fn normalized_term(&self) -> String {
        self.search_term.to_lowercase()
    }
}

/// The searchable projection of one rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    name: String,
    username: String,
    tags: Vec<BadgeTag>,
}

impl FilterEntry {
    pub fn from_record(record: &ContributorRecord) -> Self {
        Self {
            name: record.name_key().to_lowercase(),
            username: record.appreciation_key().to_lowercase(),
            tags: record.badge_tags().collect(),
        }
    }

    fn matches(&self, term: &str, badge: BadgeFilter) -> bool {
        let search_hit = term.is_empty() || self.name.contains(term) || self.username.contains(term);
        let badge_hit = match badge {
            BadgeFilter::All => true,
            BadgeFilter::Tag(tag) => self.tags.contains(&tag),
        };
        search_hit && badge_hit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub visible: Vec<bool>,
    pub count: usize,
    pub summary: String,
}

/// Computes which entries are shown. Pure: the same inputs always give the
/// same outcome.
pub fn apply_filter(entries: &[FilterEntry], state: &FilterState, total: usize) -> FilterOutcome {
    let term = state.normalized_term();
    let visible: Vec<bool> = entries
        .iter()
        .map(|entry| entry.matches(&term, state.active_badge))
        .collect();
    let count = visible.iter().filter(|v| **v).count();
    let summary = summarize(count, total, &term, state.active_badge);

    FilterOutcome {
        visible,
        count,
        summary,
    }
}

fn summarize(count: usize, total: usize, term: &str, badge: BadgeFilter) -> String {
    match (term.is_empty(), badge) {
        (true, BadgeFilter::All) => format!(
            "Showing all {}",
            plural(total as u64, "contributor", "contributors")
        ),
        (false, BadgeFilter::All) => {
            format!("{} of {} match search \"{}\"", count, total, term)
        }
        (true, BadgeFilter::Tag(tag)) => {
            format!("{} of {} have the {} badge", count, total, tag.label())
        }
        (false, BadgeFilter::Tag(tag)) => format!(
            "{} of {} match search \"{}\" with the {} badge",
            count,
            total,
            term,
            tag.label()
        ),
    }
}
