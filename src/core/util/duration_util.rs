use chrono::Duration;

use crate::errors::CostModelError;

/// Parses durations such as `24h`, `1h30m`, `90s` or `7d`.
///
/// Span syntax is `humantime`'s. A leading sign and a bare `0` are handled
/// here since `humantime` only yields non-negative spans.
pub fn parse_duration(raw: &str) -> Result<Duration, CostModelError> {
    let err = || CostModelError::InvalidDuration(raw.to_string());

    let s = raw.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }

    let std_duration = humantime::parse_duration(rest).map_err(|_| err())?;
    let d = Duration::from_std(std_duration).map_err(|_| err())?;
    Ok(if negative { -d } else { d })
}

pub fn duration_hours(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 3_600_000.0
}
