use crate::domain::ContributorRecord;
use crate::services::appreciation::{AppreciationEntry, Reaction, SendOutcome};
use crate::services::statistics::{Section, StatsReport};
use crate::services::wall_service::{CardView, WallView};
use std::fmt::Write;

const BAR_WIDTH: f64 = 20.0;

fn bar(percent: f64) -> String {
    let cells = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH).round() as usize;
    "█".repeat(cells)
}

fn reactions_line(entry: &AppreciationEntry) -> String {
    Reaction::ALL
        .iter()
        .map(|r| {
            let mark = if entry.has_sent(r.as_str()) { "*" } else { "" };
            format!("{} {}{}", r.emoji(), entry.count(r.as_str()), mark)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn card(out: &mut String, card: &CardView) {
    let new = if card.is_newest { "[NEW] " } else { "" };
    let _ = writeln!(out, "{}{} {}", new, card.display_name, card.handle);
    let _ = writeln!(out, "    {}", card.profile_url);
    if let Some(added_at) = &card.added_at {
        let _ = writeln!(out, "    joined {}", added_at);
    }
    if let Some(message) = &card.message {
        let _ = writeln!(out, "    \"{}\"", message);
    }
    if !card.badges.is_empty() {
        let badges: Vec<String> = card
            .badges
            .iter()
            .map(|b| format!("{} {}", b.icon, b.label))
            .collect();
        let _ = writeln!(out, "    {}", badges.join("  "));
    }
    let _ = writeln!(out, "    {}", reactions_line(&card.appreciation));
}

/// Text rendition of the wall: header, filter summary, then visible cards.
pub fn render_wall(view: &WallView) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", view.count_text);
    if let Some(latest) = &view.latest_contributor {
        let _ = write!(out, " · latest: {}", latest);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{} (sorted {})", view.summary, view.sort);
    let _ = writeln!(out);

    for c in view.cards.iter().filter(|c| c.visible) {
        card(&mut out, c);
    }
    out
}

pub fn render_spotlight(record: &ContributorRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "✨ Spotlight: {} {}", record.display_name(), record.handle());
    let _ = writeln!(out, "    {}", record.profile_url());
    if let Some(message) = &record.message {
        let _ = writeln!(out, "    \"{}\"", message);
    }
    out
}

pub fn render_send(username: &str, reaction: Reaction, outcome: &SendOutcome) -> String {
    if outcome.accepted {
        format!(
            "{} sent to {} ({} {}, {} total)",
            reaction.emoji(),
            username,
            outcome.count,
            reaction,
            outcome.total
        )
    } else {
        format!("You already sent {} to {}", reaction, username)
    }
}

fn section<T>(
    out: &mut String,
    title: &str,
    failure_name: &str,
    empty: &str,
    section: &Section<T>,
    body: impl FnOnce(&mut String, &T),
) {
    let _ = writeln!(out, "{}", title);
    match section {
        Section::Ready(value) => body(out, value),
        Section::NoData => {
            let _ = writeln!(out, "  {}", empty);
        }
        Section::Failed(_) => {
            let _ = writeln!(
                out,
                "  Could not load {} statistics. Please refresh and try again.",
                failure_name
            );
        }
    }
    let _ = writeln!(out);
}

pub fn render_report(report: &StatsReport) -> String {
    let mut out = String::new();

    section(&mut out, "Overview", "overview", "No data available.", &report.overview, |out, o| {
        let dash = "-".to_string();
        let _ = writeln!(out, "  Total contributors: {}", o.total);
        let _ = writeln!(out, "  Newest contributor: {}", o.newest.as_ref().unwrap_or(&dash));
        let _ = writeln!(out, "  First contributor:  {}", o.first.as_ref().unwrap_or(&dash));
        let average = o
            .average_per_month
            .map(|a| a.to_string())
            .unwrap_or(dash);
        let _ = writeln!(out, "  Average per month:  {}", average);
    });

    section(
        &mut out,
        "Badge distribution",
        "badge",
        "No badges have been awarded yet.",
        &report.badge_distribution,
        |out, shares| {
            for s in shares {
                let _ = writeln!(
                    out,
                    "  {} {:<16} {} ({}%) {}",
                    s.icon,
                    s.label,
                    s.count,
                    s.percentage,
                    bar(s.percentage as f64)
                );
            }
        },
    );

    section(
        &mut out,
        "Growth over time",
        "growth",
        "No growth data available.",
        &report.growth,
        |out, points| {
            for p in points {
                let _ = writeln!(
                    out,
                    "  {:<9} {:<20} {} (+{})",
                    p.label,
                    bar(p.height_percent),
                    p.cumulative,
                    p.new_count
                );
            }
        },
    );

    section(
        &mut out,
        "Name statistics",
        "name",
        "No name data available.",
        &report.names,
        |out, n| {
            let _ = writeln!(
                out,
                "  Most common name: {} ({} contributors)",
                n.most_common.name, n.most_common.count
            );
            let _ = writeln!(
                out,
                "  Longest name:     {} ({} characters)",
                n.longest.name, n.longest.length
            );
            let _ = writeln!(
                out,
                "  Shortest name:    {} ({} characters)",
                n.shortest.name, n.shortest.length
            );
        },
    );

    section(
        &mut out,
        "Fun facts",
        "fun facts",
        "No fun facts available yet.",
        &report.fun_facts,
        |out, facts| {
            for fact in facts {
                let _ = writeln!(out, "  • {}", fact);
            }
        },
    );

    out
}
