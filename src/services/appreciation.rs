use crate::domain::{KeyValueStore, StorageKeys};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The reactions offered on each card. The store itself accepts any key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Clap,
    Heart,
    Star,
    Rocket,
    Party,
}

impl Reaction {
    pub const ALL: [Reaction; 5] = [
        Reaction::Clap,
        Reaction::Heart,
        Reaction::Star,
        Reaction::Rocket,
        Reaction::Party,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Clap => "clap",
            Reaction::Heart => "heart",
            Reaction::Star => "star",
            Reaction::Rocket => "rocket",
            Reaction::Party => "party",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Reaction::Clap => "👏",
            Reaction::Heart => "❤️",
            Reaction::Star => "⭐",
            Reaction::Rocket => "🚀",
            Reaction::Party => "🎉",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Reaction::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown reaction '{}'", s))
    }
}

/// What one browser has sent to one username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppreciationEntry {
    #[serde(default)]
    pub sent: Vec<String>,
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
}

impl AppreciationEntry {
    pub fn has_sent(&self, reaction: &str) -> bool {
        self.sent.iter().any(|r| r == reaction)
    }

    pub fn count(&self, reaction: &str) -> u64 {
        self.counts.get(reaction).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

pub type AppreciationState = BTreeMap<String, AppreciationEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub accepted: bool,
    pub count: u64,
    pub total: u64,
}

/// Once-per-type reaction counters, persisted under
/// [`StorageKeys::APPRECIATION`] as `username -> {sent, counts}`.
///
/// This is a best-effort cache: read failures yield empty state and write
/// failures are logged and dropped.
pub struct AppreciationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl AppreciationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn load(&self) -> AppreciationState {
        let bytes = match self.kv.get(StorageKeys::APPRECIATION) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return AppreciationState::new(),
            Err(e) => {
                warn!("Could not read appreciation state: {}", e);
                return AppreciationState::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Discarding corrupt appreciation state: {}", e);
            AppreciationState::new()
        })
    }

    pub fn save(&self, state: &AppreciationState) {
        if let Err(e) = self.try_save(state) {
            warn!("Could not persist appreciation state: {}", e);
        }
    }

    fn try_save(&self, state: &AppreciationState) -> Result<()> {
        let bytes = serde_json::to_vec(state)?;
        self.kv.set(StorageKeys::APPRECIATION, &bytes)
    }

    /// The entry for `username`, empty if nothing was ever sent.
    pub fn entry(&self, username: &str) -> AppreciationEntry {
        self.load().remove(username).unwrap_or_default()
    }

    /// Records `reaction` for `username` unless it was already sent. The
    /// load, update and save happen as one step.
    pub fn send(&self, username: &str, reaction: &str) -> SendOutcome {
        if username.is_empty() {
            debug!("Sending '{}' to the shared bucket of contributors without a username", reaction);
        }

        let mut state = self.load();
        let entry = state.entry(username.to_string()).or_default();

        if entry.has_sent(reaction) {
            debug!("'{}' already sent to '{}'", reaction, username);
            return SendOutcome {
                accepted: false,
                count: entry.count(reaction),
                total: entry.total(),
            };
        }

        entry.sent.push(reaction.to_string());
        *entry.counts.entry(reaction.to_string()).or_insert(0) += 1;
        let outcome = SendOutcome {
            accepted: true,
            count: entry.count(reaction),
            total: entry.total(),
        };

        self.save(&state);
        info!("Sent '{}' to '{}'", reaction, username);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WallError;
    use crate::infrastructure::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(WallError::Other("storage unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(WallError::Other("quota exceeded".to_string()))
        }
    }

    fn store() -> (Arc<MemoryStore>, AppreciationStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), AppreciationStore::new(kv))
    }

    #[test]
    fn test_send_is_once_per_type() {
        let (_, store) = store();
        let first = store.send("ana", "clap");
        let second = store.send("ana", "clap");

        assert!(first.accepted);
        assert!(!second.accepted);
        assert_eq!(second.count, 1);
        assert_eq!(store.entry("ana").count("clap"), 1);
    }

    #[test]
    fn test_counts_are_per_type_and_per_user() {
        let (_, store) = store();
        store.send("ana", "clap");
        let heart = store.send("ana", "heart");
        store.send("bo", "clap");

        assert_eq!(heart, SendOutcome { accepted: true, count: 1, total: 2 });
        assert_eq!(store.entry("bo").total(), 1);
        assert_eq!(store.entry("cy"), AppreciationEntry::default());
    }

    #[test]
    fn test_state_persists_in_documented_shape() {
        let (kv, store) = store();
        store.send("ana", "rocket");

        let raw = kv.get(StorageKeys::APPRECIATION).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ana": {"sent": ["rocket"], "counts": {"rocket": 1}}})
        );

        let reopened = AppreciationStore::new(kv);
        assert!(reopened.entry("ana").has_sent("rocket"));
    }

    #[test]
    fn test_empty_username_shares_one_bucket() {
        let (_, store) = store();
        assert!(store.send("", "star").accepted);
        assert!(!store.send("", "star").accepted);
    }

    #[test]
    fn test_corrupt_state_reads_as_empty() {
        let (kv, store) = store();
        kv.set(StorageKeys::APPRECIATION, b"{not json").unwrap();
        assert!(store.load().is_empty());
        assert!(store.send("ana", "clap").accepted);
    }

    #[test]
    fn test_broken_storage_never_surfaces() {
        let store = AppreciationStore::new(Arc::new(BrokenStore));
        assert!(store.load().is_empty());
        let outcome = store.send("ana", "clap");
        assert!(outcome.accepted);
        assert_eq!(outcome.count, 1);
        // Nothing was persisted, so the next send is accepted again.
        assert!(store.send("ana", "clap").accepted);
    }

    #[test]
    fn test_reaction_vocabulary() {
        assert_eq!("party".parse::<Reaction>(), Ok(Reaction::Party));
        assert!("boo".parse::<Reaction>().is_err());
        assert_eq!(Reaction::ALL.len(), 5);
    }
}
