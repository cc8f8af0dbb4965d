use tracing_subscriber::EnvFilter;

/// Install the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `linthook=warn`, or `linthook=debug`
/// with `verbose`. Repeated calls are ignored.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "linthook=debug"
    } else {
        "linthook=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
