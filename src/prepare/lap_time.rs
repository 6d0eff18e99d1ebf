/// Parses a fastest-lap string from the results export into seconds.
///
/// Two shapes are accepted: `"M:SS.mmm"` (minutes, one separator, seconds)
/// and a plain seconds value such as `"87.123"`. Anything else (empty
/// strings, `N/A`, a second separator, non-numeric parts) is an absent
/// value, not an error.
pub fn parse_lap_time(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.split_once(':') {
        Some((minutes, seconds)) => {
            if seconds.contains(':') {
                return None;
            }
            let minutes: u32 = minutes.parse().ok()?;
            let seconds: f64 = seconds.parse().ok()?;
            Some(minutes as f64 * 60.0 + seconds).filter(|v| v.is_finite())
        }
        None => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}
