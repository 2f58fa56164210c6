//! Tracing subscriber bootstrap
//!
//! Library code only emits `tracing` events. Binaries, examples and test
//! harnesses call [`init_tracing`] once to print them.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` (e.g.
/// `"afero_infra=debug,info"`). With `json` set, events are written as one
/// JSON object per line.
///
/// Returns `false` when a global subscriber was already installed, which
/// makes repeated calls from tests harmless.
pub fn init_tracing(default_filter: &str, json: bool) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = if json { builder.json().try_init() } else { builder.compact().try_init() };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_noop() {
        let _ = init_tracing("info", false);
        assert!(!init_tracing("debug", true));
    }
}
