use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber for the `lcds` binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug output for
/// this crate and warnings only when quiet.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "lc_datastore=debug" } else { "lc_datastore=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // fails only when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
