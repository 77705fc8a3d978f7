//! Virtual-path resolution helpers shared across host abstractions.
//!
//! Paths are handled as ordered segment lists rooted at the virtual filesystem root. The string
//! form uses `/` as the separator; `\` is accepted on input and treated the same way.

/// Splits `path` into non-empty segments, resolving `.` and `..` against the root.
///
/// `..` at the root is clamped: the result never escapes the root.
pub fn virtual_path_segments(path: &str) -> Vec<String> {
    resolve_segments(Vec::new(), path)
}

/// Resolves `input` against `current`, returning root-relative segments.
///
/// Inputs starting with a separator are absolute and ignore `current`. Relative inputs are joined
/// onto `current`. In both cases `.` segments are dropped and `..` pops one segment, clamped at
/// the root.
pub fn resolve_virtual_path<S: AsRef<str>>(input: &str, current: &[S]) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return virtual_path_segments(trimmed);
    }

    let base = current
        .iter()
        .map(|segment| segment.as_ref())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    resolve_segments(base, trimmed)
}

/// Normalizes a virtual filesystem path into its canonical string form.
///
/// The result always has a leading slash and no trailing slash; an empty or fully-collapsed path
/// normalizes to `/`.
pub fn normalize_virtual_path(path: &str) -> String {
    join_virtual_path(&virtual_path_segments(path))
}

/// Joins segments into a canonical absolute path string.
pub fn join_virtual_path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    out
}

fn resolve_segments(mut resolved: Vec<String>, path: &str) -> Vec<String> {
    for segment in path.trim().replace('\\', "/").split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            name => resolved.push(name.to_string()),
        }
    }
    resolved
}
