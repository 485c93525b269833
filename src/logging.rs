use tracing::Level;

/// Log level for the number of `-v` flags given.
pub fn level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a subscriber printing to stderr, keeping stdout free for
/// command output.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(level(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
