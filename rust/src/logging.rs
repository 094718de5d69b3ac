//! Diagnostics on stderr, gated by the network's verbosity.
//!
//! The message is neither formatted nor evaluated below the threshold. Each
//! line is tagged with its level, e.g. `[checks] Initial event 1, ...`.
//!
//! | level | name    | reported                                           |
//! |-------|---------|----------------------------------------------------|
//! | 0     | silent  | nothing                                            |
//! | 1     | changes | activities added, removed or rejected; schedules   |
//! | 2     | checks  | boundary events, loops, pruned path branches       |
//! | 3     | debug   | every event time set by the forward/backward pass  |

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

const LEVEL_NAMES: [&str; 4] = ["silent", "changes", "checks", "debug"];

/// Tag printed in front of messages at `level`. Levels above debug print as debug.
pub fn level_name(level: u8) -> &'static str {
    LEVEL_NAMES[usize::from(level.min(VERBOSITY_DEBUG))]
}

/// Parse a verbosity given as a number (`2`) or a level name (`checks`).
pub fn parse_verbosity(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();
    if let Ok(level) = raw.parse::<u8>() {
        return Ok(level.min(VERBOSITY_DEBUG));
    }
    LEVEL_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(raw))
        .map(|i| i as u8)
        .ok_or_else(|| {
            format!(
                "unknown verbosity {:?}, expected 0-3 or one of {}",
                raw,
                LEVEL_NAMES.join(", ")
            )
        })
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $level {
            eprintln!("[{}] {}", $crate::logging::level_name($level), format_args!($($arg)*));
        }
    };
}

/// Mutations of the activity set and schedule, rejected activities.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHANGES, $verbosity, $($arg)*)
    };
}

/// Boundary events, loop detection, pruned branches.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHECKS, $verbosity, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(VERBOSITY_SILENT), "silent");
        assert_eq!(level_name(VERBOSITY_CHECKS), "checks");
        assert_eq!(level_name(9), "debug");
    }

    #[test]
    fn test_parse_verbosity() {
        assert_eq!(parse_verbosity("2"), Ok(VERBOSITY_CHECKS));
        assert_eq!(parse_verbosity("Changes"), Ok(VERBOSITY_CHANGES));
        assert_eq!(parse_verbosity(" debug "), Ok(VERBOSITY_DEBUG));
        assert_eq!(parse_verbosity("7"), Ok(VERBOSITY_DEBUG));
        assert!(parse_verbosity("loud").is_err());
    }

    #[test]
    fn test_below_threshold_is_not_evaluated() {
        let mut evaluated = false;
        let mut touch = || {
            evaluated = true;
            "x"
        };
        log_changes!(VERBOSITY_SILENT, "{}", touch());
        log_checks!(VERBOSITY_CHANGES, "{}", touch());
        log_debug!(VERBOSITY_CHECKS, "{}", touch());
        assert!(!evaluated);
    }
}
