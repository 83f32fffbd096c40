use crate::collect::Metrics;
use crate::model::{Dataset, Result};
use indexmap::IndexMap;

/// Copies the login to avatar-URL mapping for the roster into the metrics
/// document. Stripped again before the snapshot enters the historic archive.
pub(crate) fn execute(data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
    let mut avatars: IndexMap<String, String> = IndexMap::new();
    for member in members {
        if let Some(avatar_url) = data.members_images.get(member) {
            avatars.insert(member.clone(), avatar_url.clone());
        }
    }
    metrics.insert("avatars".to_string(), serde_json::to_value(avatars)?);
    Ok(())
}
