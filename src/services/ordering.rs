use crate::domain::ContributorRecord;
use crate::utils::CollationKey;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl SortMode {
    /// Unknown modes fall back to `Newest`.
    pub fn parse(mode: &str) -> Self {
        match mode {
            "oldest" => SortMode::Oldest,
            "name-asc" => SortMode::NameAsc,
            "name-desc" => SortMode::NameDesc,
            _ => SortMode::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::NameAsc => "name-asc",
            SortMode::NameDesc => "name-desc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positions into `records`, arranged in `mode` order. The sort is stable, so
/// records with equal keys keep their file order.
pub fn sort_indices(records: &[ContributorRecord], mode: SortMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..records.len()).collect();

    match mode {
        SortMode::Newest => indices.sort_by_cached_key(|&i| {
            let r = &records[i];
            (Reverse(r.added_at_key().to_string()), CollationKey::new(r.name_key()))
        }),
        SortMode::Oldest => indices.sort_by_cached_key(|&i| {
            let r = &records[i];
            (r.added_at_key().to_string(), CollationKey::new(r.name_key()))
        }),
        SortMode::NameAsc => {
            indices.sort_by_cached_key(|&i| CollationKey::new(records[i].sort_name()))
        }
        SortMode::NameDesc => {
            indices.sort_by_cached_key(|&i| Reverse(CollationKey::new(records[i].sort_name())))
        }
    }

    indices
}

/// A sorted copy of `records`; the input is left untouched.
pub fn sort_records(records: &[ContributorRecord], mode: SortMode) -> Vec<ContributorRecord> {
    sort_indices(records, mode)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, name: Option<&str>, added_at: Option<&str>) -> ContributorRecord {
        ContributorRecord {
            username: Some(username.to_string()),
            name: name.map(str::to_string),
            added_at: added_at.map(str::to_string),
            ..Default::default()
        }
    }

    fn usernames(records: &[ContributorRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.username.as_deref().unwrap_or(""))
            .collect()
    }

    fn sample() -> Vec<ContributorRecord> {
        vec![
            record("ana", Some("Ana Lee"), Some("2024-01-10")),
            record("bo", Some("Bo"), Some("2024-03-02")),
            record("cy", None, Some("2023-11-30T08:00:00Z")),
            record("dee", Some("Élodie"), Some("2024-02-14")),
        ]
    }

    #[test]
    fn test_newest_is_reverse_of_oldest() {
        let records = sample();
        let newest = sort_records(&records, SortMode::Newest);
        let mut oldest = sort_records(&records, SortMode::Oldest);
        oldest.reverse();
        assert_eq!(newest, oldest);
        assert_eq!(usernames(&newest), vec!["bo", "dee", "ana", "cy"]);
    }

    #[test]
    fn test_sort_preserves_length_in_every_mode() {
        let records = sample();
        for mode in [
            SortMode::Newest,
            SortMode::Oldest,
            SortMode::NameAsc,
            SortMode::NameDesc,
        ] {
            let sorted = sort_records(&records, mode);
            assert_eq!(sorted.len(), records.len());
            let mut seen = usernames(&sorted);
            seen.sort();
            assert_eq!(seen, vec!["ana", "bo", "cy", "dee"]);
        }
    }

    #[test]
    fn test_missing_added_at_sorts_lowest() {
        let records = vec![
            record("ana", Some("Ana"), Some("2024-01-10")),
            record("zed", Some("Zed"), None),
        ];
        assert_eq!(usernames(&sort_records(&records, SortMode::Oldest)), vec!["zed", "ana"]);
        assert_eq!(usernames(&sort_records(&records, SortMode::Newest)), vec!["ana", "zed"]);
    }

    #[test]
    fn test_same_date_ties_break_by_name_ascending() {
        let records = vec![
            record("z", Some("Zoe"), Some("2024-01-10")),
            record("a", Some("adam"), Some("2024-01-10")),
        ];
        assert_eq!(usernames(&sort_records(&records, SortMode::Newest)), vec!["a", "z"]);
        assert_eq!(usernames(&sort_records(&records, SortMode::Oldest)), vec!["a", "z"]);
    }

    #[test]
    fn test_name_orders_fall_back_to_username_and_respect_accents() {
        let records = sample();
        assert_eq!(
            usernames(&sort_records(&records, SortMode::NameAsc)),
            vec!["ana", "bo", "cy", "dee"]
        );
        assert_eq!(
            usernames(&sort_records(&records, SortMode::NameDesc)),
            vec!["dee", "cy", "bo", "ana"]
        );
    }

    #[test]
    fn test_name_ties_keep_input_order() {
        let records = vec![
            record("first", Some("Sam"), None),
            record("second", Some("Sam"), None),
        ];
        assert_eq!(
            usernames(&sort_records(&records, SortMode::NameAsc)),
            vec!["first", "second"]
        );
        assert_eq!(
            usernames(&sort_records(&records, SortMode::NameDesc)),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_unknown_mode_falls_back_to_newest() {
        assert_eq!(SortMode::parse("shuffle"), SortMode::Newest);
        assert_eq!(SortMode::parse("name-desc"), SortMode::NameDesc);
    }
}
