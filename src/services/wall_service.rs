use crate::domain::{badge_info, Badge, ContributorRecord, KeyValueStore, StorageKeys};
use crate::error::WallError;
use crate::services::appreciation::{AppreciationEntry, AppreciationStore, Reaction, SendOutcome};
use crate::services::filtering::{apply_filter, BadgeFilter, FilterEntry, FilterState};
use crate::services::ordering::{sort_indices, SortMode};
use crate::services::spotlight::{pick, RandomSource};
use crate::services::statistics::{build_report, StatsReport};
use crate::utils::plural;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub icon: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BadgeView {
    fn from_badge(badge: &Badge) -> Option<Self> {
        match badge {
            Badge::Tag(key) => {
                let (icon, label) = badge_info(key);
                Some(Self {
                    icon: icon.to_string(),
                    label,
                    color: None,
                })
            }
            Badge::Custom(custom) => custom.text.as_ref().map(|text| Self {
                icon: "🏅".to_string(),
                label: text.clone(),
                color: custom.color.clone(),
            }),
            Badge::Other(_) => None,
        }
    }
}

/// Everything the render layer needs to draw one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub username: Option<String>,
    pub display_name: String,
    pub handle: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub aria_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    pub badges: Vec<BadgeView>,
    pub is_newest: bool,
    pub visible: bool,
    pub appreciation: AppreciationEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallView {
    pub count_text: String,
    pub latest_contributor: Option<String>,
    pub sort: SortMode,
    pub filter: FilterState,
    pub summary: String,
    pub visible_count: usize,
    pub cards: Vec<CardView>,
}

/// Interaction state of one wall: the loaded records plus the current sort,
/// filter, spotlight and the appreciation store. The engines it calls stay
/// pure; all mutable state lives here.
pub struct WallSession {
    records: Vec<ContributorRecord>,
    entries: Vec<FilterEntry>,
    sort: SortMode,
    filter: FilterState,
    spotlight: Option<usize>,
    kv: Arc<dyn KeyValueStore>,
    appreciation: AppreciationStore,
}

impl WallSession {
    pub fn new(records: Vec<ContributorRecord>, kv: Arc<dyn KeyValueStore>) -> Self {
        let entries = records.iter().map(FilterEntry::from_record).collect();
        let spotlight = Self::load_spotlight(kv.as_ref()).filter(|&i| i < records.len());
        info!("Wall session ready with {} contributors", records.len());

        Self {
            records,
            entries,
            sort: SortMode::default(),
            filter: FilterState::default(),
            spotlight,
            appreciation: AppreciationStore::new(kv.clone()),
            kv,
        }
    }

    fn load_spotlight(kv: &dyn KeyValueStore) -> Option<usize> {
        match kv.get(StorageKeys::SPOTLIGHT) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read last spotlight: {}", e);
                None
            }
        }
    }

    pub fn records(&self) -> &[ContributorRecord] {
        &self.records
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        debug!("Sort changed to {}", sort);
        self.sort = sort;
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search_term = term.to_string();
    }

    pub fn set_badge(&mut self, badge: BadgeFilter) {
        self.filter.active_badge = badge;
    }

    /// Username of the record with the greatest `addedAt`, first one wins.
    fn newest_username(&self) -> Option<Option<&str>> {
        self.records
            .iter()
            .fold(None, |latest: Option<&ContributorRecord>, curr| match latest {
                Some(l) if curr.added_at_key() <= l.added_at_key() => Some(l),
                _ => Some(curr),
            })
            .map(|r| r.username.as_deref())
    }

    /// The wall in current sort order, with visibility from the current
    /// filter applied.
    pub fn view(&self) -> WallView {
        let order = sort_indices(&self.records, self.sort);
        let ordered_entries: Vec<FilterEntry> =
            order.iter().map(|&i| self.entries[i].clone()).collect();
        let outcome = apply_filter(&ordered_entries, &self.filter, self.records.len());
        let newest = self.newest_username();
        let appreciation = self.appreciation.load();

        let cards = order
            .iter()
            .zip(outcome.visible.iter())
            .map(|(&i, &visible)| {
                let r = &self.records[i];
                CardView {
                    username: r.username.clone(),
                    display_name: r.display_name().to_string(),
                    handle: r.handle(),
                    avatar_url: r.avatar_url(),
                    profile_url: r.profile_url(),
                    aria_label: r.aria_label(),
                    message: r.message.clone(),
                    added_at: r.added_at.clone(),
                    badges: r.badges.iter().filter_map(BadgeView::from_badge).collect(),
                    is_newest: newest == Some(r.username.as_deref()),
                    visible,
                    appreciation: appreciation
                        .get(r.appreciation_key())
                        .cloned()
                        .unwrap_or_default(),
                }
            })
            .collect();

        let latest_contributor = sort_indices(&self.records, SortMode::Newest)
            .first()
            .map(|&i| self.records[i].label().to_string());

        WallView {
            count_text: plural(self.records.len() as u64, "contributor", "contributors"),
            latest_contributor,
            sort: self.sort,
            filter: self.filter.clone(),
            summary: outcome.summary,
            visible_count: outcome.count,
            cards,
        }
    }

    /// Highlights a random contributor, never the one shown last time.
    pub fn spotlight(&mut self, rng: &mut dyn RandomSource) -> Option<&ContributorRecord> {
        let index = pick(self.records.len(), self.spotlight, rng)?;
        self.spotlight = Some(index);

        let saved = serde_json::to_vec(&index)
            .map_err(WallError::from)
            .and_then(|bytes| self.kv.set(StorageKeys::SPOTLIGHT, &bytes));
        if let Err(e) = saved {
            warn!("Could not persist spotlight: {}", e);
        }

        self.records.get(index)
    }

    pub fn appreciation_for(&self, username: &str) -> AppreciationEntry {
        self.appreciation.entry(username)
    }

    pub fn appreciate(&self, username: &str, reaction: Reaction) -> SendOutcome {
        self.appreciation.send(username, reaction.as_str())
    }

    pub fn report(&self) -> StatsReport {
        build_report(&self.records)
    }
}
