// Snapshot encoding for the persisted task collection

use crate::models::Task;
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Serialize the whole collection into one JSON array blob
pub fn encode(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize task snapshot")
}

/// Parse a snapshot blob back into a collection, preserving stored order
///
/// A blank blob is treated as an empty collection. Anything else that is not a
/// JSON array of tasks is an error.
pub fn decode(blob: &str) -> Result<Vec<Task>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tasks: Vec<Task> = serde_json::from_str(blob).context("Failed to parse task snapshot")?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            warn!(id = %task.id, "Duplicate task id in snapshot");
        }
    }

    debug!(count = tasks.len(), "Decoded task snapshot");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(TaskId::new(2), "Clean House");
        done.toggle();
        vec![Task::new(TaskId::new(1), "Buy Milk"), done]
    }

    #[test]
    fn test_encode_is_json_array() {
        let blob = encode(&sample()).unwrap();
        assert!(blob.starts_with('['));
        assert!(blob.contains(r#""title":"Buy Milk""#));
        assert!(blob.contains(r#""isDone":true"#));
    }

    #[test]
    fn test_decode_preserves_order_and_fields() {
        let tasks = sample();
        let decoded = decode(&encode(&tasks).unwrap()).unwrap();
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_decode_blank_is_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("  \n").unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        assert!(decode("{malformed json}").is_err());
        assert!(decode(r#"{"id":1,"title":"x","isDone":false}"#).is_err());
        assert!(decode(r#"[{"id":"one","title":"x","isDone":false}]"#).is_err());
        assert!(decode(r#"[{"id":1,"title":"x"}]"#).is_err());
    }

    #[test]
    fn test_decode_keeps_duplicates() {
        let blob = r#"[{"id":1,"title":"a","isDone":false},{"id":1,"title":"b","isDone":true}]"#;
        let decoded = decode(blob).unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_title_is_stored_raw() {
        let tasks = vec![Task::new(TaskId::new(1), "  padded  ")];
        let decoded = decode(&encode(&tasks).unwrap()).unwrap();
        assert_eq!(decoded[0].title, "  padded  ");
    }
}
