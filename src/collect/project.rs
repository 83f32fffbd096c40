use crate::collect::Metrics;
use crate::model::{Dataset, Result};
use indexmap::IndexMap;
use serde_json::json;

const STATUS_DONE: &str = "Done";
const STATUS_IN_PROGRESS: &str = "In Progress";

pub(crate) fn execute(data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
    let mut assigned_per_member: IndexMap<String, u64> =
        members.iter().map(|m| (m.clone(), 0)).collect();
    let mut done_per_member: IndexMap<String, u64> =
        members.iter().map(|m| (m.clone(), 0)).collect();
    let mut in_progress_per_member: IndexMap<String, u64> =
        members.iter().map(|m| (m.clone(), 0)).collect();
    let mut non_assigned = 0u64;
    let mut total = 0u64;
    let mut total_done = 0u64;
    let mut total_in_progress = 0u64;

    for item in data.project.values() {
        total += 1;
        let status = item.status.as_deref();
        if status == Some(STATUS_DONE) {
            total_done += 1;
        } else if status == Some(STATUS_IN_PROGRESS) {
            total_in_progress += 1;
        }
        let roster_assignee = item
            .assignee
            .as_ref()
            .filter(|assignee| assigned_per_member.contains_key(*assignee));
        if let Some(assignee) = roster_assignee {
            assigned_per_member[assignee] += 1;
            if status == Some(STATUS_DONE) {
                done_per_member[assignee] += 1;
            } else if status == Some(STATUS_IN_PROGRESS) {
                in_progress_per_member[assignee] += 1;
            }
        } else {
            non_assigned += 1;
        }
    }

    metrics.insert(
        "project".to_string(),
        json!({
            "assigned_per_member": assigned_per_member,
            "in_progress_per_member": in_progress_per_member,
            "done_per_member": done_per_member,
            "non_assigned": non_assigned,
            "in_progress": total_in_progress,
            "done": total_done,
            "total": total,
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectItem;
    use pretty_assertions::assert_eq;

    fn members() -> Vec<String> {
        vec!["anna".to_string(), "marc".to_string()]
    }

    fn item(assignee: Option<&str>, status: Option<&str>) -> ProjectItem {
        ProjectItem::new(
            Some("task".to_string()),
            assignee.map(String::from),
            status.map(String::from),
        )
    }

    #[test]
    fn splits_items_by_status_and_assignee() {
        let mut data = Dataset::default();
        data.project
            .insert("ITEM_1".into(), item(Some("anna"), Some("Done")));
        data.project
            .insert("ITEM_2".into(), item(Some("anna"), Some("In Progress")));
        data.project
            .insert("ITEM_3".into(), item(None, Some("Done")));
        data.project.insert("ITEM_4".into(), item(None, None));

        let mut metrics = Metrics::new();
        execute(&data, &mut metrics, &members()).unwrap();

        let project = &metrics["project"];
        assert_eq!(project["assigned_per_member"]["anna"], json!(2));
        assert_eq!(project["done_per_member"]["anna"], json!(1));
        assert_eq!(project["in_progress_per_member"]["anna"], json!(1));
        assert_eq!(project["non_assigned"], json!(2));
        assert_eq!(project["done"], json!(2));
        assert_eq!(project["in_progress"], json!(1));
        assert_eq!(project["total"], json!(4));
    }

    #[test]
    fn non_roster_assignees_count_as_non_assigned() {
        let mut data = Dataset::default();
        data.project
            .insert("ITEM_1".into(), item(Some("stranger"), Some("Done")));

        let mut metrics = Metrics::new();
        execute(&data, &mut metrics, &members()).unwrap();

        let project = &metrics["project"];
        assert_eq!(project["non_assigned"], json!(1));
        assert_eq!(project["assigned_per_member"].get("stranger"), None);
    }
}
