use crate::collect::Metrics;
use crate::model::{Dataset, Result};
use indexmap::IndexMap;
use serde_json::json;

pub(crate) fn execute(data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
    let mut created: IndexMap<String, u64> = members.iter().map(|m| (m.clone(), 0)).collect();
    let mut merged_per_member: IndexMap<String, u64> =
        members.iter().map(|m| (m.clone(), 0)).collect();
    let mut total = 0u64;
    let mut merged = 0u64;
    let mut closed = 0u64;
    let mut not_merged_by_author = 0u64;

    for pull_request in data.pull_requests.values() {
        total += 1;
        if let Some(count) = created.get_mut(&pull_request.author) {
            *count += 1;
        }
        if pull_request.merged {
            merged += 1;
            if let Some(merged_by) = &pull_request.merged_by {
                if let Some(count) = merged_per_member.get_mut(merged_by) {
                    *count += 1;
                }
                if *merged_by != pull_request.author {
                    not_merged_by_author += 1;
                }
            }
        } else if pull_request.state == "CLOSED" {
            // A merged pull request also reports state CLOSED, hence the else.
            closed += 1;
        }
    }

    metrics.insert(
        "pull_requests".to_string(),
        json!({
            "created": created,
            "merged_per_member": merged_per_member,
            "merged": merged,
            "not_merged_by_author": not_merged_by_author,
            "closed": closed,
            "total": total,
        }),
    );
    Ok(())
}
