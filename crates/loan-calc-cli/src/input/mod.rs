pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a request document from `--input`, else from piped stdin.
///
/// Returns `None` when neither is present so the caller can fall back to
/// individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        tracing::info!(path, "reading request document");
        return Ok(Some(file::read_document(path)?));
    }
    if let Some(text) = stdin::read_stdin()? {
        tracing::info!(bytes = text.len(), "reading request document from stdin");
        // YAML is a superset of JSON, so one parser covers both.
        return Ok(Some(serde_yaml::from_str(&text)?));
    }
    Ok(None)
}
