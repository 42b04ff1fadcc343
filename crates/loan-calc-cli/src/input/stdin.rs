use std::io::{self, Read};

/// Read a piped request document from stdin.
///
/// Returns `None` when stdin is a terminal or the pipe carried only
/// whitespace, so an interactive invocation falls through to flags.
pub fn read_stdin() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}
