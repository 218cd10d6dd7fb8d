//! Logging setup for the policy binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the process that embeds the engine.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when present and valid, otherwise `default_level`
/// for this crate and `warn` for everything else.
pub fn filter(default_level: &str, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.is_empty()) {
        if let Ok(f) = EnvFilter::try_new(directives) {
            return f;
        }
    }
    EnvFilter::new(format!("warn,poker_policy={default_level}"))
}

/// Install a stderr fmt subscriber. Stdout is reserved for decisions.
/// Returns false when a global subscriber was already set.
pub fn init_logging(default_level: &str) -> bool {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level, rust_log.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_applies_to_this_crate() {
        let f = filter("debug", None).to_string();
        assert!(f.contains("poker_policy=debug"), "{f}");
    }

    #[test]
    fn rust_log_takes_precedence() {
        let f = filter("debug", Some("trace")).to_string();
        assert!(f.contains("trace"), "{f}");
        assert!(!f.contains("poker_policy=debug"), "{f}");
    }

    #[test]
    fn empty_rust_log_is_ignored() {
        let f = filter("info", Some("")).to_string();
        assert!(f.contains("poker_policy=info"), "{f}");
    }
}
