//! Track length text codec.
//!
//! Converts between the `M:SS` / `H:MM:SS` strings shown to users and the
//! integer seconds the lookup API expects.
//!
//! Parsing is positional and lenient about ranges: `1:75` is 135 seconds.
//! Only output of [`format_duration`] is guaranteed to round-trip.

/// Errors from parsing a length string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("Expected M:SS or H:MM:SS, got {0:?}")]
    WrongSegmentCount(String),

    #[error("Invalid duration component {component:?} in {input:?}")]
    InvalidComponent { input: String, component: String },
}

/// Parse `M:SS` or `H:MM:SS` into seconds.
pub fn parse_duration(text: &str) -> Result<u64, DurationError> {
    let parts: Vec<&str> = text.split(':').collect();
    if !matches!(parts.len(), 2 | 3) {
        return Err(DurationError::WrongSegmentCount(text.to_string()));
    }

    parts.iter().try_fold(0u64, |acc, part| {
        let value = parse_component(text, part)?;
        acc.checked_mul(60)
            .and_then(|acc| acc.checked_add(value))
            .ok_or_else(|| DurationError::InvalidComponent {
                input: text.to_string(),
                component: part.to_string(),
            })
    })
}

/// Only ASCII digits; `u64::from_str` alone would let `+5` through.
fn parse_component(input: &str, part: &str) -> Result<u64, DurationError> {
    let invalid = || DurationError::InvalidComponent {
        input: input.to_string(),
        component: part.to_string(),
    };

    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    part.parse().map_err(|_| invalid())
}

/// Render seconds as `M:SS` below one hour, `H:MM:SS` otherwise.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours == 0 {
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    }
}
