// Holdaccent Timeouts
// Per-case substitution windows, clamped into the supported range

use std::time::Duration;

pub const MIN_DELAY_MS: u64 = 50;
pub const MAX_DELAY_MS: u64 = 2000;
pub const DELAY_STEP_MS: u64 = 25;

pub const DEFAULT_LOWERCASE_DELAY_MS: u64 = 400;
pub const DEFAULT_UPPERCASE_DELAY_MS: u64 = 700;

/// Clamp a configured delay into [`MIN_DELAY_MS`, `MAX_DELAY_MS`] and round
/// it to the nearest [`DELAY_STEP_MS`].
///
/// Both range bounds are multiples of the step, so rounding never leaves
/// the range.
pub fn sanitize_delay_ms(value: i64) -> u64 {
    let clamped = value.clamp(MIN_DELAY_MS as i64, MAX_DELAY_MS as i64) as u64;
    (clamped + DELAY_STEP_MS / 2) / DELAY_STEP_MS * DELAY_STEP_MS
}

/// A pending key is "uppercase" iff it is exactly one scalar and that scalar
/// is an uppercase letter.
pub fn is_uppercase_key(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => ch.is_alphabetic() && ch.is_uppercase(),
        _ => false,
    }
}

/// Lowercase and uppercase substitution windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    lowercase: Duration,
    uppercase: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            lowercase: Duration::from_millis(DEFAULT_LOWERCASE_DELAY_MS),
            uppercase: Duration::from_millis(DEFAULT_UPPERCASE_DELAY_MS),
        }
    }
}

impl TimeoutConfig {
    /// Build from raw configured values, sanitising both
    pub fn from_millis(lowercase_ms: i64, uppercase_ms: i64) -> Self {
        let lowercase = sanitize_delay_ms(lowercase_ms);
        let uppercase = sanitize_delay_ms(uppercase_ms);

        if lowercase as i64 != lowercase_ms {
            log::warn!("DelayLowercase {} adjusted to {}", lowercase_ms, lowercase);
        }
        if uppercase as i64 != uppercase_ms {
            log::warn!("DelayUppercase {} adjusted to {}", uppercase_ms, uppercase);
        }

        Self {
            lowercase: Duration::from_millis(lowercase),
            uppercase: Duration::from_millis(uppercase),
        }
    }

    pub fn lowercase(&self) -> Duration {
        self.lowercase
    }

    pub fn uppercase(&self) -> Duration {
        self.uppercase
    }

    /// Effective delay for a pending key
    pub fn delay_for(&self, text: &str) -> Duration {
        if is_uppercase_key(text) {
            self.uppercase
        } else {
            self.lowercase
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_clamps_range() {
        assert_eq!(sanitize_delay_ms(0), MIN_DELAY_MS);
        assert_eq!(sanitize_delay_ms(-300), MIN_DELAY_MS);
        assert_eq!(sanitize_delay_ms(49), MIN_DELAY_MS);
        assert_eq!(sanitize_delay_ms(2001), MAX_DELAY_MS);
        assert_eq!(sanitize_delay_ms(i64::MAX), MAX_DELAY_MS);
    }

    #[test]
    fn test_sanitize_rounds_to_step() {
        assert_eq!(sanitize_delay_ms(400), 400);
        assert_eq!(sanitize_delay_ms(412), 400);
        assert_eq!(sanitize_delay_ms(413), 425);
        assert_eq!(sanitize_delay_ms(1990), 2000);
        assert_eq!(sanitize_delay_ms(60), 50);
    }

    #[test]
    fn test_uppercase_classification() {
        assert!(is_uppercase_key("A"));
        assert!(is_uppercase_key("Ä"));
        assert!(!is_uppercase_key("a"));
        assert!(!is_uppercase_key("1"));
        assert!(!is_uppercase_key("AB"));
        assert!(!is_uppercase_key(""));
    }

    #[test]
    fn test_uppercase_symbols_are_not_letters() {
        // Circled letters and Roman numerals carry the Uppercase property
        assert!(!is_uppercase_key("Ⓐ"));
        assert!(!is_uppercase_key("Ⅷ"));

        let timeouts = TimeoutConfig::default();
        assert_eq!(timeouts.delay_for("Ⓐ"), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_for_picks_case() {
        let timeouts = TimeoutConfig::from_millis(300, 900);
        assert_eq!(timeouts.delay_for("a"), Duration::from_millis(300));
        assert_eq!(timeouts.delay_for("O"), Duration::from_millis(900));
        assert_eq!(timeouts.delay_for("-"), Duration::from_millis(300));
    }

    #[test]
    fn test_default_timeouts() {
        let timeouts = TimeoutConfig::default();
        assert_eq!(timeouts.lowercase(), Duration::from_millis(400));
        assert_eq!(timeouts.uppercase(), Duration::from_millis(700));
    }
}
