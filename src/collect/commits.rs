use crate::collect::Metrics;
use crate::model::{Dataset, Result};
use chrono::{Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::HashSet;

pub(crate) fn execute(data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
    collect(data, metrics, members, Utc::now().date_naive())
}

#[derive(Debug, Clone, Copy, Default)]
struct LineTotals {
    additions: u64,
    deletions: u64,
    modified: u64,
}

impl LineTotals {
    fn add(&mut self, additions: u64, deletions: u64, modified: u64) {
        self.additions += additions;
        self.deletions += deletions;
        self.modified += modified;
    }

    fn value(&self) -> Value {
        json!({
            "additions": self.additions,
            "deletions": self.deletions,
            "modified": self.modified,
        })
    }
}

fn collect(
    data: &Dataset,
    metrics: &mut Metrics,
    members: &[String],
    today: NaiveDate,
) -> Result<()> {
    let mut commits_per_member: IndexMap<String, u64> =
        members.iter().map(|m| (m.clone(), 0)).collect();
    let mut lines_per_member: IndexMap<String, LineTotals> = members
        .iter()
        .map(|m| (m.clone(), LineTotals::default()))
        .collect();
    let mut commit_dates: IndexMap<String, HashSet<NaiveDate>> = members
        .iter()
        .map(|m| (m.clone(), HashSet::new()))
        .collect();
    let mut anonymous_commits = 0u64;
    let mut total_commits = 0u64;
    let mut totals = LineTotals::default();
    let mut commit_merges = 0u64;

    // Merge commits count only towards `commit_merges`.
    for commit in data.commits.values() {
        if commit.merge {
            commit_merges += 1;
        } else if let Some(count) = commits_per_member.get_mut(&commit.author) {
            *count += 1;
            total_commits += 1;
            if let Some(dates) = commit_dates.get_mut(&commit.author) {
                dates.insert(commit.date);
            }
            if let Some(lines) = lines_per_member.get_mut(&commit.author) {
                lines.add(commit.additions, commit.deletions, commit.modified);
            }
            totals.add(commit.additions, commit.deletions, commit.modified);
        } else {
            anonymous_commits += 1;
            total_commits += 1;
        }
    }

    let mut streaks: IndexMap<String, u64> = IndexMap::new();
    for member in members {
        let dates = commit_dates.get(member).cloned().unwrap_or_default();
        streaks.insert(member.clone(), commit_streak(&dates, today));
    }

    // The all-time maximum reads whatever the previous run persisted.
    let previous_longest = metrics.get("longest_commit_streak_per_user").cloned();
    let mut longest: IndexMap<String, u64> = IndexMap::new();
    for (member, streak) in &streaks {
        let previous = previous_longest
            .as_ref()
            .and_then(|v| v.get(member))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        longest.insert(member.clone(), (*streak).max(previous));
    }

    let mut commits_section = serde_json::to_value(&commits_per_member)?;
    commits_section["anonymous"] = json!(anonymous_commits);
    commits_section["total"] = json!(total_commits);

    let mut lines_section: IndexMap<String, Value> = lines_per_member
        .iter()
        .map(|(member, lines)| (member.clone(), lines.value()))
        .collect();
    lines_section.insert("total".to_string(), totals.value());

    metrics.insert("commits".to_string(), commits_section);
    metrics.insert(
        "modified_lines".to_string(),
        serde_json::to_value(lines_section)?,
    );
    metrics.insert("commit_streak".to_string(), serde_json::to_value(&streaks)?);
    metrics.insert("commit_merges".to_string(), json!(commit_merges));
    metrics.insert(
        "longest_commit_streak_per_user".to_string(),
        serde_json::to_value(&longest)?,
    );
    Ok(())
}

/// Consecutive calendar days with at least one commit, counting backward
/// from today when today has one, otherwise from yesterday.
fn commit_streak(dates: &HashSet<NaiveDate>, today: NaiveDate) -> u64 {
    let yesterday = today - Duration::days(1);
    let start = if dates.contains(&today) {
        today
    } else if dates.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };
    let mut streak = 1;
    let mut day = start - Duration::days(1);
    while dates.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}
