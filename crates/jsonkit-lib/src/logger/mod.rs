use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber with timestamp, level, and target.
/// If `debug` is true, sets the log level to DEBUG; otherwise INFO.
///
/// Output goes to stderr so it never mixes with JSON written to stdout.
pub fn init(debug: bool) {
    fmt()
        .with_env_filter(filter(debug))
        .with_timer(fmt::time::SystemTime)
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}
