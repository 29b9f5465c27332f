//! Debug switch shared by the core and its front-ends.
//!
//! # Environment Variables
//!
//! - `AURA_DEBUG=1` - raise log verbosity to `debug`

use std::sync::OnceLock;

/// Cached debug enabled state (read once on first access)
static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

pub const DEBUG_ENV: &str = "AURA_DEBUG";

/// Check if debug mode is enabled via `AURA_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var(DEBUG_ENV).map(|v| parse_flag(&v)).unwrap_or(false))
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Default tracing filter directive for front-ends.
///
/// Targets are crate names as seen by `tracing`: the core library and the
/// `aura` binary.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose || is_debug_enabled() {
        "aura_core=debug,aura=debug"
    } else {
        "aura_core=info,aura=info"
    }
}
