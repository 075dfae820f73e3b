//! Free-form study notes with tags and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form input for creating or editing a note.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        Ok(())
    }

    pub fn into_note(self, now: DateTime<Utc>) -> Result<Note, ValidationError> {
        self.validate()?;
        Ok(Note {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            subject: self.subject,
            content: self.content,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Split comma-separated tag input, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-insensitive match against title, content, and tags.
    pub search: Option<String>,
    pub subject: Option<String>,
}

/// Filtered view, most recently updated first.
pub fn filtered<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    let term = filter.search.as_deref().map(str::to_lowercase);
    let mut out: Vec<&Note> = notes
        .iter()
        .filter(|n| match &term {
            Some(term) => {
                n.title.to_lowercase().contains(term)
                    || n.content.to_lowercase().contains(term)
                    || n.tags.iter().any(|t| t.to_lowercase().contains(term))
            }
            None => true,
        })
        .filter(|n| {
            filter
                .subject
                .as_deref()
                .map(|s| n.subject == s)
                .unwrap_or(true)
        })
        .collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
}
