//! Identifier helpers.
//!
//! Identifiers are slash-delimited path strings relative to the channel
//! root. These helpers are purely lexical: nothing here talks to the server
//! or rejects an identifier.

/// Canonical form of an identifier: no trailing slash (except the root), no
/// empty, `.` or `..` segments.
pub fn normalize(identifier: &str) -> String {
    let absolute = identifier.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in identifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Append one child name to a canonical parent identifier.
pub fn join(parent: &str, name: &str) -> String {
    match parent {
        "/" => format!("/{}", name),
        "" | "." => name.to_string(),
        _ => format!("{}/{}", parent.trim_end_matches('/'), name),
    }
}

/// Final segment of an identifier.
pub fn basename(identifier: &str) -> &str {
    let trimmed = identifier.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, name)) => name,
        None => trimmed,
    }
}

/// Every prefix of a canonical identifier, shortest first, ending with the
/// identifier itself. The root is never included.
pub fn ancestors(identifier: &str) -> Vec<String> {
    let canonical = normalize(identifier);
    let absolute = canonical.starts_with('/');
    let mut current = String::new();
    let mut result = Vec::new();

    for segment in canonical.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        result.push(current.clone());
    }

    result
}
