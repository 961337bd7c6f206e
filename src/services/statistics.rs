use crate::domain::{badge_info, ContributorRecord};
use crate::error::{Result, WallError};
use crate::services::ordering::{sort_indices, SortMode};
use crate::utils::{format_long_date, parse_date, percentage, plural, round_ratio, YearMonth};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, error};

const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;
const MIN_BAR_HEIGHT: f64 = 8.0;

/// One report section. A failure in one section never affects the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "kebab-case")]
pub enum Section<T> {
    Ready(T),
    NoData,
    Failed(String),
}

impl<T> Section<T> {
    fn compute(name: &str, compute: impl FnOnce() -> Result<Option<T>>) -> Self {
        debug!("Calculating {}...", name);
        match compute() {
            Ok(Some(value)) => Section::Ready(value),
            Ok(None) => Section::NoData,
            Err(e) => {
                error!("Error calculating {}: {}", name, e);
                Section::Failed(e.to_string())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total: usize,
    pub newest: Option<String>,
    pub first: Option<String>,
    pub average_per_month: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeShare {
    pub key: String,
    pub icon: &'static str,
    pub label: String,
    pub count: usize,
    pub percentage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub month: YearMonth,
    pub label: String,
    pub new_count: usize,
    pub cumulative: usize,
    /// Bar height in percent of the largest cumulative value, floored at 8.
    pub height_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameLength {
    pub name: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameStats {
    pub most_common: NameCount,
    pub longest: NameLength,
    pub shortest: NameLength,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FunFact {
    FirstContributor { name: String, date: String },
    BusiestMonth { month: String, count: usize },
    MostCommonFirstName { name: String, count: usize },
    BadgeShare { percentage: u64 },
    LongestMessage { author: String, length: usize },
    AveragePerWeek { average: u64 },
}

impl fmt::Display for FunFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunFact::FirstContributor { name, date } => {
                write!(f, "The first contributor was {}, who joined on {}", name, date)
            }
            FunFact::BusiestMonth { month, count } => write!(
                f,
                "{} was our busiest month with {} new contributors",
                month, count
            ),
            FunFact::MostCommonFirstName { name, count } => write!(
                f,
                "The most common first name is \"{}\" (appears {})",
                name,
                plural(*count as u64, "time", "times")
            ),
            FunFact::BadgeShare { percentage } => write!(
                f,
                "{}% of contributors have at least one badge",
                percentage
            ),
            FunFact::LongestMessage { author, length } => write!(
                f,
                "The longest message is {} characters long by {}",
                length, author
            ),
            FunFact::AveragePerWeek { average } => write!(
                f,
                "Average of {} per week",
                plural(*average, "contributor", "contributors")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub overview: Section<Overview>,
    pub badge_distribution: Section<Vec<BadgeShare>>,
    pub growth: Section<Vec<GrowthPoint>>,
    pub names: Section<NameStats>,
    pub fun_facts: Section<Vec<FunFact>>,
}

/// Counts keys while remembering the order each key was first seen.
struct Tally<K> {
    entries: Vec<(K, usize)>,
    index: AHashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Highest count; ties go to the key seen first.
    fn top(&self) -> Option<&(K, usize)> {
        self.entries
            .iter()
            .fold(None, |best: Option<&(K, usize)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
    }
}

/// Parsed `addedAt` values, skipping records without a valid date.
fn valid_dates(records: &[ContributorRecord]) -> Vec<DateTime<Utc>> {
    records
        .iter()
        .filter_map(|r| r.added_at.as_deref().and_then(parse_date))
        .collect()
}

fn date_range(dates: &[DateTime<Utc>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = dates.iter().min()?;
    let last = dates.iter().max()?;
    Some((*first, *last))
}

fn first_names(records: &[ContributorRecord]) -> Tally<String> {
    let mut tally = Tally::new();
    for name in records.iter().filter_map(|r| r.name.as_deref()) {
        if let Some(first) = name.split(' ').next() {
            tally.add(first.to_string());
        }
    }
    tally
}

fn monthly_counts(dates: &[DateTime<Utc>]) -> Tally<YearMonth> {
    let mut tally = Tally::new();
    for date in dates {
        tally.add(YearMonth::of(date));
    }
    tally
}

pub fn overview(records: &[ContributorRecord]) -> Result<Option<Overview>> {
    let label_of = |mode: SortMode| {
        sort_indices(records, mode)
            .first()
            .map(|&i| records[i].label().to_string())
    };

    let average_per_month = match date_range(&valid_dates(records)) {
        Some((first, last)) => {
            let span = YearMonth::of(&first).months_until(&YearMonth::of(&last));
            let span = usize::try_from(span)
                .map_err(|_| WallError::Parse(format!("invalid month span {}", span)))?;
            round_ratio(records.len(), span.max(1))
        }
        None => None,
    };

    Ok(Some(Overview {
        total: records.len(),
        newest: label_of(SortMode::Newest),
        first: label_of(SortMode::Oldest),
        average_per_month,
    }))
}

pub fn badge_distribution(records: &[ContributorRecord]) -> Result<Option<Vec<BadgeShare>>> {
    let mut tally = Tally::new();
    for badge in records.iter().flat_map(|r| r.badges.iter()) {
        if let Some(key) = badge.kind_key() {
            tally.add(key.to_string());
        }
    }

    if tally.entries.is_empty() {
        return Ok(None);
    }

    let total = records.len();
    let shares = tally
        .entries
        .into_iter()
        .map(|(key, count)| {
            let (icon, label) = badge_info(&key);
            BadgeShare {
                icon,
                label,
                count,
                percentage: percentage(count, total).unwrap_or(0),
                key,
            }
        })
        .collect();

    Ok(Some(shares))
}

pub fn growth(records: &[ContributorRecord]) -> Result<Option<Vec<GrowthPoint>>> {
    let mut months = monthly_counts(&valid_dates(records)).entries;
    if months.is_empty() {
        return Ok(None);
    }
    months.sort_by_key(|(month, _)| *month);

    let mut cumulative = 0usize;
    let series: Vec<(YearMonth, usize, usize)> = months
        .into_iter()
        .map(|(month, new_count)| {
            cumulative += new_count;
            (month, new_count, cumulative)
        })
        .collect();

    let max = series.iter().map(|(_, _, c)| *c).max().unwrap_or(0).max(1);

    Ok(Some(
        series
            .into_iter()
            .map(|(month, new_count, cumulative)| GrowthPoint {
                label: month.short_label(),
                month,
                new_count,
                cumulative,
                height_percent: (100.0 * cumulative as f64 / max as f64).max(MIN_BAR_HEIGHT),
            })
            .collect(),
    ))
}

pub fn name_stats(records: &[ContributorRecord]) -> Result<Option<NameStats>> {
    let tally = first_names(records);
    let Some((name, count)) = tally.top().cloned() else {
        return Ok(None);
    };

    let mut longest: Option<NameLength> = None;
    let mut shortest: Option<NameLength> = None;
    for full in records.iter().filter_map(|r| r.name.as_deref()) {
        let length = full.chars().count();
        if longest.as_ref().map_or(true, |l| length > l.length) {
            longest = Some(NameLength { name: full.to_string(), length });
        }
        if shortest.as_ref().map_or(true, |s| length < s.length) {
            shortest = Some(NameLength { name: full.to_string(), length });
        }
    }

    match (longest, shortest) {
        (Some(longest), Some(shortest)) => Ok(Some(NameStats {
            most_common: NameCount { name, count },
            longest,
            shortest,
        })),
        _ => Err(WallError::Parse("first names found without full names".to_string())),
    }
}

pub fn fun_facts(records: &[ContributorRecord]) -> Result<Option<Vec<FunFact>>> {
    let mut facts = Vec::new();
    let dates = valid_dates(records);

    if let Some(&i) = sort_indices(records, SortMode::Oldest).first() {
        let first = &records[i];
        if let Some(date) = first.added_at.as_deref().and_then(parse_date) {
            facts.push(FunFact::FirstContributor {
                name: first.label().to_string(),
                date: format_long_date(&date),
            });
        }
    }

    if let Some((month, count)) = monthly_counts(&dates).top() {
        facts.push(FunFact::BusiestMonth {
            month: month.long_label(),
            count: *count,
        });
    }

    if let Some((name, count)) = first_names(records).top() {
        facts.push(FunFact::MostCommonFirstName {
            name: name.clone(),
            count: *count,
        });
    }

    let with_badges = records.iter().filter(|r| !r.badges.is_empty()).count();
    if let Some(percentage) = percentage(with_badges, records.len()) {
        facts.push(FunFact::BadgeShare { percentage });
    }

    let mut longest_message: Option<(&ContributorRecord, usize)> = None;
    for record in records {
        if let Some(message) = record.message.as_deref() {
            let length = message.chars().count();
            if longest_message.map_or(true, |(_, l)| length > l) {
                longest_message = Some((record, length));
            }
        }
    }
    if let Some((record, length)) = longest_message {
        facts.push(FunFact::LongestMessage {
            author: record.label().to_string(),
            length,
        });
    }

    if let Some((first, last)) = date_range(&dates) {
        let millis = (last - first).num_milliseconds();
        let weeks = ((millis + WEEK_MILLIS - 1) / WEEK_MILLIS).max(1);
        let weeks = usize::try_from(weeks)
            .map_err(|_| WallError::Parse(format!("invalid week span {}", weeks)))?;
        if let Some(average) = round_ratio(records.len(), weeks) {
            facts.push(FunFact::AveragePerWeek { average });
        }
    }

    Ok(if facts.is_empty() { None } else { Some(facts) })
}

/// Builds every report section over the full record set.
pub fn build_report(records: &[ContributorRecord]) -> StatsReport {
    StatsReport {
        overview: Section::compute("overview stats", || overview(records)),
        badge_distribution: Section::compute("badge distribution", || {
            badge_distribution(records)
        }),
        growth: Section::compute("growth over time", || growth(records)),
        names: Section::compute("name statistics", || name_stats(records)),
        fun_facts: Section::compute("fun facts", || fun_facts(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parsing::parse_records;

    fn records(text: &str) -> Vec<ContributorRecord> {
        parse_records(text)
    }

    fn sample() -> Vec<ContributorRecord> {
        records(concat!(
            r#"{"username":"ana","name":"Ana Lee","addedAt":"2024-01-10","badges":["core","helper"],"message":"Hello there"}"#,
            "\n",
            r##"{"username":"bo","name":"Bo","addedAt":"2024-03-02","badges":[{"type":"custom","text":"Docs","color":"#0af"}]}"##,
            "\n",
            r#"{"username":"ana2","name":"Ana Maria Lopez","addedAt":"2024-03-20","badges":["helper"],"message":"Hi"}"#,
            "\n",
            r#"{"username":"nodate","name":"Cy"}"#,
            "\n",
            r#"{"username":"baddate","addedAt":"someday"}"#,
        ))
    }

    #[test]
    fn test_overview_average_per_month() {
        let two = records(concat!(
            r#"{"username":"ana","name":"Ana Lee","addedAt":"2024-01-10"}"#,
            "\n",
            r#"{"username":"bo","name":"Bo","addedAt":"2024-03-02"}"#,
        ));
        let overview = overview(&two).unwrap().unwrap();
        assert_eq!(overview.total, 2);
        assert_eq!(overview.newest.as_deref(), Some("Bo"));
        assert_eq!(overview.first.as_deref(), Some("Ana Lee"));
        assert_eq!(overview.average_per_month, Some(1));
    }

    #[test]
    fn test_overview_first_is_undated_record() {
        let overview = overview(&sample()).unwrap().unwrap();
        assert_eq!(overview.total, 5);
        assert_eq!(overview.first.as_deref(), Some("Cy"));
        assert_eq!(overview.newest.as_deref(), Some("baddate"));
        assert_eq!(overview.average_per_month, Some(2));
    }

    #[test]
    fn test_overview_empty() {
        let overview = overview(&[]).unwrap().unwrap();
        assert_eq!(overview.total, 0);
        assert_eq!(overview.newest, None);
        assert_eq!(overview.average_per_month, None);
    }

    #[test]
    fn test_badge_distribution_keeps_first_seen_order() {
        let shares = badge_distribution(&sample()).unwrap().unwrap();
        let summary: Vec<(&str, usize, u64)> = shares
            .iter()
            .map(|s| (s.key.as_str(), s.count, s.percentage))
            .collect();
        assert_eq!(
            summary,
            vec![("core", 1, 20), ("helper", 2, 40), ("custom", 1, 20)]
        );
        assert_eq!(shares[0].label, "Core Team");
        assert_eq!(shares[2].icon, "🏅");
    }

    #[test]
    fn test_badge_distribution_no_badges() {
        let none = records(r#"{"username":"ana"}"#);
        assert_eq!(badge_distribution(&none).unwrap(), None);
    }

    #[test]
    fn test_growth_is_cumulative_and_chronological() {
        let points = growth(&sample()).unwrap().unwrap();
        let series: Vec<(String, usize, usize)> = points
            .iter()
            .map(|p| (p.month.to_string(), p.new_count, p.cumulative))
            .collect();
        assert_eq!(
            series,
            vec![("2024-01".to_string(), 1, 1), ("2024-03".to_string(), 2, 3)]
        );
        assert!(points.windows(2).all(|w| w[0].cumulative <= w[1].cumulative));
        assert_eq!(points.last().unwrap().cumulative, 3);
        assert_eq!(points[0].label, "Jan 2024");
        assert!((points[0].height_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(points[1].height_percent, 100.0);
    }

    #[test]
    fn test_growth_reads_slash_and_month_name_dates() {
        let mixed = records(concat!(
            r#"{"addedAt":"2024/01/10"}"#,
            "\n",
            r#"{"addedAt":"Jan 10, 2024"}"#,
        ));
        let points = growth(&mixed).unwrap().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].month.to_string(), "2024-01");
        assert_eq!(points[0].new_count, 2);
        assert_eq!(points[0].cumulative, 2);
    }

    #[test]
    fn test_growth_bar_floor() {
        let mut text = String::from(r#"{"addedAt":"2023-01-01"}"#);
        for _ in 0..20 {
            text.push_str("\n{\"addedAt\":\"2024-06-01\"}");
        }
        let points = growth(&records(&text)).unwrap().unwrap();
        assert_eq!(points[0].height_percent, 8.0);
    }

    #[test]
    fn test_name_stats() {
        let stats = name_stats(&sample()).unwrap().unwrap();
        assert_eq!(stats.most_common, NameCount { name: "Ana".to_string(), count: 2 });
        assert_eq!(stats.longest.name, "Ana Maria Lopez");
        assert_eq!(stats.longest.length, 15);
        assert_eq!(stats.shortest.name, "Bo");
    }

    #[test]
    fn test_name_stats_ties_go_to_first_occurrence() {
        let tied = records(concat!(
            r#"{"name":"Al"}"#,
            "\n",
            r#"{"name":"Bo"}"#,
            "\n",
            r#"{"name":"Bo"}"#,
            "\n",
            r#"{"name":"Al"}"#,
        ));
        let stats = name_stats(&tied).unwrap().unwrap();
        assert_eq!(stats.most_common.name, "Al");
        assert_eq!(stats.longest.name, "Al");
        assert_eq!(stats.shortest.name, "Al");
    }

    #[test]
    fn test_first_name_splits_on_single_space() {
        let spaced = records(concat!(
            r#"{"name":" Ana"}"#,
            "\n",
            r#"{"name":"Bo  Li"}"#,
            "\n",
            r#"{"name":" Cy"}"#,
        ));
        let stats = name_stats(&spaced).unwrap().unwrap();
        assert_eq!(stats.most_common, NameCount { name: String::new(), count: 2 });
        assert_eq!(stats.longest.name, "Bo  Li");
    }

    #[test]
    fn test_unrecognised_badge_items_still_count_as_badged() {
        let odd = records(concat!(
            r#"{"username":"ana","badges":[7]}"#,
            "\n",
            r#"{"username":"bo","badges":[]}"#,
        ));
        let sentences: Vec<String> = fun_facts(&odd)
            .unwrap()
            .unwrap()
            .iter()
            .map(|f| f.to_string())
            .collect();
        assert!(sentences.contains(&"50% of contributors have at least one badge".to_string()));
        assert_eq!(badge_distribution(&odd).unwrap(), None);
    }

    #[test]
    fn test_fun_facts_sentences() {
        let facts = fun_facts(&sample()).unwrap().unwrap();
        let sentences: Vec<String> = facts.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            sentences,
            vec![
                "March 2024 was our busiest month with 2 new contributors",
                "The most common first name is \"Ana\" (appears 2 times)",
                "60% of contributors have at least one badge",
                "The longest message is 11 characters long by Ana Lee",
                "Average of 1 contributor per week",
            ]
        );
    }

    #[test]
    fn test_first_contributor_fact_needs_a_date() {
        let dated = records(concat!(
            r#"{"username":"ana","name":"Ana Lee","addedAt":"2024-01-10"}"#,
            "\n",
            r#"{"username":"bo","addedAt":"2024-01-12"}"#,
        ));
        let facts = fun_facts(&dated).unwrap().unwrap();
        assert_eq!(
            facts[0].to_string(),
            "The first contributor was Ana Lee, who joined on January 10, 2024"
        );
        assert_eq!(
            facts.last().unwrap().to_string(),
            "Average of 2 contributors per week"
        );
    }

    #[test]
    fn test_empty_input_degrades_to_no_data() {
        let report = build_report(&[]);
        assert!(matches!(report.overview, Section::Ready(_)));
        assert_eq!(report.badge_distribution, Section::NoData);
        assert_eq!(report.growth, Section::NoData);
        assert_eq!(report.names, Section::NoData);
        assert_eq!(report.fun_facts, Section::NoData);
    }

    #[test]
    fn test_failed_section_is_isolated() {
        let failed: Section<u32> =
            Section::compute("broken", || Err(WallError::Other("boom".to_string())));
        assert_eq!(failed, Section::Failed("boom".to_string()));
        assert_eq!(failed.ready(), None);
    }
}
