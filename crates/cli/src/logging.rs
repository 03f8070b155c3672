use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Quiet by default (errors only); `--verbose` lowers the filter to `debug`.
/// `RUST_LOG` overrides both. Engine advisories arrive through the `log`
/// bridge and show up as warnings.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second install (tests, embedding) fails and keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
