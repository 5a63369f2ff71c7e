//! crates/health_tracker_core/src/notes.rs
//!
//! Search and tag filtering for notes.

use crate::domain::Note;

/// Keeps notes whose title or content contains `query` (case-insensitive) and
/// which carry every tag in `tags`. An empty query or empty tag list matches all.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str, tags: &[String]) -> Vec<&'a Note> {
    let query = query.to_lowercase();
    notes
        .iter()
        .filter(|note| {
            let matches_query = note.title.to_lowercase().contains(&query)
                || note.content.to_lowercase().contains(&query);
            let matches_tags = tags.iter().all(|tag| note.tags.contains(tag));
            matches_query && matches_tags
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note(title: &str, content: &str, tags: &[&str]) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn titles<'a>(notes: &[&'a Note]) -> Vec<&'a str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn matches_title_or_content_ignoring_case() {
        let notes = vec![
            note("Leg day", "squats and lunges", &["gym"]),
            note("Groceries", "buy SPINACH", &["food"]),
            note("Sleep", "8 hours", &[]),
        ];
        assert_eq!(titles(&filter_notes(&notes, "LEG", &[])), vec!["Leg day"]);
        assert_eq!(titles(&filter_notes(&notes, "spinach", &[])), vec!["Groceries"]);
        assert_eq!(filter_notes(&notes, "", &[]).len(), 3);
    }

    #[test]
    fn requires_every_requested_tag() {
        let notes = vec![
            note("a", "", &["gym", "legs"]),
            note("b", "", &["gym"]),
            note("c", "", &["legs"]),
        ];
        let gym_legs = vec!["gym".to_string(), "legs".to_string()];
        assert_eq!(titles(&filter_notes(&notes, "", &gym_legs)), vec!["a"]);
        assert_eq!(titles(&filter_notes(&notes, "", &["gym".to_string()])), vec!["a", "b"]);
    }
}
