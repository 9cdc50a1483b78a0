/// Returns the current Unix timestamp in seconds.
pub fn current_unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Extracts the first run of ASCII digits in `raw` as a second count.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let start = raw.find(|ch: char| ch.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Renders a raw `"Ns"` duration as `"Ns (HH:MM:SS)"`.
///
/// Values without a parsable number are returned unchanged, so the
/// `"N/A"` placeholder survives formatting.
pub fn format_duration(raw: &str) -> String {
    let Some(seconds) = parse_duration_seconds(raw) else {
        return raw.to_string();
    };
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{seconds}s ({hours:02}:{minutes:02}:{secs:02})")
}
