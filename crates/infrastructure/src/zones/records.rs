use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Parses flat `domain,ip` record lines. Comment lines (`#`) and blank
/// lines are skipped, fields are trimmed, domains lowercased; when a domain
/// repeats, the last entry wins.
pub fn parse_records(text: &str) -> HashMap<String, String> {
    let mut records = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((domain, address)) = line.split_once(',') else {
            warn!(line = %line, "skipping record line without a comma");
            continue;
        };
        records.insert(
            domain.trim().to_ascii_lowercase(),
            address.trim().to_string(),
        );
    }
    records
}

/// Loads the records file for an authoritative zone. A missing or
/// unreadable file yields an empty table rather than an error, so a server
/// can start before its data exists.
pub fn load_records(path: &Path) -> HashMap<String, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "records file unavailable, starting with empty table");
            return HashMap::new();
        }
    };
    let records = parse_records(&text);
    info!(path = %path.display(), count = records.len(), "loaded zone records");
    records
}
