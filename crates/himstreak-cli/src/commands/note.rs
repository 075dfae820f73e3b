use chrono::Utc;
use clap::Subcommand;
use himstreak_core::{note::parse_tags, NoteDraft, NoteFilter};

use crate::common;

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a note
    Add {
        /// Note title
        title: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Replace a note's content, keeping its creation time
    Edit {
        /// Note id
        id: String,
        /// New title
        title: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// List notes, most recently updated first
    List {
        /// Case-insensitive search over title, content, and tags
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = common::open_tracker()?;
    let now = Utc::now();

    match action {
        NoteAction::Add {
            title,
            subject,
            content,
            tags,
        } => {
            let event = tracker.add_note(
                NoteDraft {
                    title,
                    subject,
                    content,
                    tags: parse_tags(&tags),
                },
                now,
            )?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        NoteAction::Edit {
            id,
            title,
            subject,
            content,
            tags,
        } => {
            let id = common::parse_id(&id)?;
            let draft = NoteDraft {
                title,
                subject,
                content,
                tags: parse_tags(&tags),
            };
            match tracker.update_note(id, draft, now)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
        NoteAction::List { search, subject } => {
            let filter = NoteFilter { search, subject };
            println!("{}", serde_json::to_string_pretty(&tracker.notes(&filter))?);
        }
        NoteAction::Delete { id } => {
            let id = common::parse_id(&id)?;
            match tracker.delete_note(id, now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => common::print_not_found(id),
            }
        }
    }
    Ok(())
}
