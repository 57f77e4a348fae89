//! JSON output formatting for notes.

use notevault_core::DecryptedNote;

/// Convert a note to JSON for output.
pub fn note_json(note: &DecryptedNote) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(note)
}

/// Convert multiple notes to JSON array for output.
pub fn notes_json(notes: &[DecryptedNote]) -> serde_json::Result<Vec<serde_json::Value>> {
    notes.iter().map(note_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_note_json_fields() {
        let note = DecryptedNote {
            id: 5,
            content: "hello".to_string(),
            owner_id: "alice".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let value = note_json(&note).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["content"], "hello");
        assert_eq!(value["owner_id"], "alice");
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_null());
        assert_eq!(notes_json(&[note]).unwrap().len(), 1);
    }
}
