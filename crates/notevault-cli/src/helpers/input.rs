use std::io::{self, IsTerminal, Read};

use crate::errors::CliError;

/// Resolve a note body from `--body` or piped stdin.
///
/// Trailing whitespace from stdin is dropped; an explicit `--body` is
/// taken as-is.
pub fn read_note_body(body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--body cannot be empty").into());
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No note body given. Pass --body or pipe the content on stdin.",
        )
        .into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    body_from_stdin(buffer)
}

fn body_from_stdin(buffer: String) -> anyhow::Result<String> {
    let trimmed = buffer.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("No input provided on stdin").into());
    }
    Ok(trimmed)
}
