use crate::collect::Metrics;
use crate::model::Result;
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;

pub const METRICS_PATH: &str = "metrics.json";
pub const HISTORIC_PATH: &str = "historic_metrics.json";

/// Reads a persisted JSON document. Missing or unparseable files yield
/// `None` so a corrupted snapshot degrades to a fresh baseline instead of
/// aborting the run.
pub fn load_document(path: &str) -> Option<Metrics> {
    let json_str = fs::read_to_string(path).ok()?;
    serde_json::from_str(&json_str).ok()
}

pub fn write_document(path: &str, document: &Metrics) -> Result<()> {
    let json_str = serde_json::to_string_pretty(document)?;
    fs::write(path, json_str)?;
    Ok(())
}

/// Upserts one snapshot into the historic archive under the given date,
/// stripping the avatars section first. Other date keys are untouched.
pub fn archive_snapshot(historic: &mut Metrics, date: NaiveDate, mut snapshot: Metrics) {
    snapshot.shift_remove("avatars");
    historic.insert(
        date.format("%Y-%m-%d").to_string(),
        Value::Object(snapshot.into_iter().collect()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use temp_dir::TempDir;

    fn snapshot() -> Metrics {
        Metrics::from([
            ("commits".to_string(), json!({ "anna": 2 })),
            ("avatars".to_string(), json!({ "anna": "https://a" })),
        ])
    }

    fn archive_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 19).unwrap()
    }

    #[test]
    fn archive_strips_avatars_and_keys_by_date() {
        let mut historic = Metrics::new();
        archive_snapshot(&mut historic, archive_date(), snapshot());

        let entry = &historic["2024-05-19"];
        assert_eq!(entry["commits"], json!({ "anna": 2 }));
        assert_eq!(entry.get("avatars"), None);
    }

    #[test]
    fn rerunning_the_same_date_overwrites_without_duplicating() {
        let mut historic = Metrics::from([(
            "2024-05-18".to_string(),
            json!({ "commits": { "anna": 1 } }),
        )]);
        archive_snapshot(&mut historic, archive_date(), snapshot());

        let mut updated = snapshot();
        updated.insert("commit_merges".to_string(), json!(4));
        archive_snapshot(&mut historic, archive_date(), updated);

        assert_eq!(historic.len(), 2);
        assert_eq!(historic["2024-05-19"]["commit_merges"], json!(4));
        // Unrelated dates survive the upsert.
        assert_eq!(historic["2024-05-18"]["commits"]["anna"], json!(1));
    }

    #[test]
    fn malformed_document_degrades_to_a_fresh_baseline() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("metrics.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_document(path.to_str().unwrap()), None);
    }

    #[test]
    fn documents_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("metrics.json");
        let document = snapshot();
        write_document(path.to_str().unwrap(), &document).unwrap();
        assert_eq!(load_document(path.to_str().unwrap()), Some(document));
    }

    #[test]
    fn missing_document_is_absent_not_an_error() {
        assert_eq!(load_document("does-not-exist.json"), None);
    }
}
