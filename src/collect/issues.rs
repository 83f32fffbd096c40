use crate::collect::Metrics;
use crate::model::{Dataset, IssueState, Result};
use indexmap::IndexMap;
use serde_json::json;

pub(crate) fn execute(data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
    let mut assigned: IndexMap<String, u64> = members.iter().map(|m| (m.clone(), 0)).collect();
    let mut closed: IndexMap<String, u64> = members.iter().map(|m| (m.clone(), 0)).collect();
    let mut non_assigned = 0u64;
    let mut have_pull_request = 0u64;
    let mut assignee_is_pr_author = 0u64;
    let mut total = 0u64;
    let mut total_closed = 0u64;

    for issue in data.issues.values() {
        if issue.state == IssueState::Closed {
            total_closed += 1;
        }
        // Issues assigned outside the roster count as unassigned.
        let roster_assignee = issue
            .assignee
            .as_ref()
            .filter(|assignee| assigned.contains_key(*assignee));
        if let Some(assignee) = roster_assignee {
            assigned[assignee] += 1;
            if issue.state == IssueState::Closed {
                closed[assignee] += 1;
                if issue.has_pull_request {
                    have_pull_request += 1;
                    if issue.pr_author_is_assignee == Some(true) {
                        assignee_is_pr_author += 1;
                    }
                }
            }
        } else {
            non_assigned += 1;
        }
        total += 1;
    }

    let mut assigned_section = serde_json::to_value(&assigned)?;
    assigned_section["non_assigned"] = json!(non_assigned);
    metrics.insert(
        "issues".to_string(),
        json!({
            "assigned": assigned_section,
            "closed": closed,
            "have_pull_request": have_pull_request,
            "assignee_is_pr_author": assignee_is_pr_author,
            "total_closed": total_closed,
            "total": total,
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Issue;
    use pretty_assertions::assert_eq;

    fn members() -> Vec<String> {
        vec!["anna".to_string(), "marc".to_string()]
    }

    fn dataset(issues: Vec<(&str, Issue)>) -> Dataset {
        let mut data = Dataset::default();
        for (id, issue) in issues {
            data.issues.insert(id.to_string(), issue);
        }
        data
    }

    #[test]
    fn closed_issue_with_own_pull_request_counts_both_ways() {
        let data = dataset(vec![(
            "I_1",
            Issue::new(IssueState::Closed, Some("anna".into()), true, Some(true)),
        )]);
        let mut metrics = Metrics::new();
        execute(&data, &mut metrics, &members()).unwrap();

        let issues = &metrics["issues"];
        assert_eq!(issues["assigned"]["anna"], json!(1));
        assert_eq!(issues["closed"]["anna"], json!(1));
        assert_eq!(issues["have_pull_request"], json!(1));
        assert_eq!(issues["assignee_is_pr_author"], json!(1));
        assert_eq!(issues["total_closed"], json!(1));
        assert_eq!(issues["total"], json!(1));
    }

    #[test]
    fn unassigned_and_foreign_assignees_count_as_non_assigned() {
        let data = dataset(vec![
            ("I_1", Issue::new(IssueState::Open, None, false, None)),
            (
                "I_2",
                Issue::new(IssueState::Open, Some("stranger".into()), false, None),
            ),
        ]);
        let mut metrics = Metrics::new();
        execute(&data, &mut metrics, &members()).unwrap();

        let issues = &metrics["issues"];
        assert_eq!(issues["assigned"]["non_assigned"], json!(2));
        assert_eq!(issues["assigned"].get("stranger"), None);
        assert_eq!(issues["total"], json!(2));
    }

    #[test]
    fn closed_pr_authored_by_someone_else_does_not_bump_author_match() {
        let data = dataset(vec![(
            "I_1",
            Issue::new(IssueState::Closed, Some("marc".into()), true, Some(false)),
        )]);
        let mut metrics = Metrics::new();
        execute(&data, &mut metrics, &members()).unwrap();

        let issues = &metrics["issues"];
        assert_eq!(issues["have_pull_request"], json!(1));
        assert_eq!(issues["assignee_is_pr_author"], json!(0));
    }
}
