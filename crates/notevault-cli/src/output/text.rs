//! Plain text output formatting for notes.

use notevault_core::DecryptedNote;

const PREVIEW_CHARS: usize = 60;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// First line of the content, cut to a fixed width.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        preview.push_str("...");
    }
    preview
}

pub fn print_note(note: &DecryptedNote, quiet: bool) {
    if quiet {
        println!("{}", note.content);
        return;
    }

    println!("ID: {}", note.id);
    println!("Owner: {}", note.owner_id);
    println!("Created: {}", note.created_at.format(TIME_FORMAT));
    if let Some(updated_at) = note.updated_at {
        println!("Updated: {}", updated_at.format(TIME_FORMAT));
    }
    println!();
    println!("{}", note.content);
}

pub fn print_note_list(notes: &[DecryptedNote], quiet: bool) {
    if notes.is_empty() {
        if !quiet {
            println!("No notes found.");
        }
        return;
    }

    for note in notes {
        if quiet {
            println!("{}", note.id);
        } else {
            println!(
                "{:>6}  {}  {}",
                note.id,
                note.created_at.format(TIME_FORMAT),
                preview(&note.content)
            );
        }
    }
}
