//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "grocer=debug,grocer_cli=debug,grocer_storefront=debug,grocer_auth=debug,grocer_db=debug,grocer_data=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable under `--json`.
///
/// `RUST_LOG` wins over `--verbose` when both are given.
pub fn init(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    // Ignore an already-installed subscriber.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
