use tracing_subscriber::EnvFilter;

/// Initializes tracing to stderr, keeping stdout for reporter output.
/// `A11Y_LOG` overrides the verbosity flag when set.
pub fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "a11y=info",
        _ => "a11y=debug",
    };

    let filter = EnvFilter::try_from_env("A11Y_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
