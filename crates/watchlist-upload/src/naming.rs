/// Replace every character outside `[A-Za-z0-9.]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Object key for an upload: `<folder>/<timestamp_ms>_<sanitized name>`
pub fn object_key(folder: &str, timestamp_ms: i64, file_name: &str) -> String {
    format!("{}/{}_{}", folder, timestamp_ms, sanitize_file_name(file_name))
}
