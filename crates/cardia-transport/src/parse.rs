/// Parse one transport line into an integer reading.
///
/// The whole trimmed line is tried first; if that fails, lines carrying
/// several numbers separated by commas or whitespace fall back to the first
/// token that parses. Lines with no parseable integer are malformed samples
/// and yield `None` — they are discarded locally, never surfaced to the core.
pub fn parse_sample_line(line: &str) -> Option<i32> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Ok(value) = line.parse::<i32>() {
        return Some(value);
    }
    line.split(|c: char| c == ',' || c.is_whitespace())
        .find_map(|token| token.parse::<i32>().ok())
}
