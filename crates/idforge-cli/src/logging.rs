// Logging and verbosity control

use tracing::Level;

/// Level selected by the `-v`/`-q` flags; quiet wins
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Initialize logging based on CLI flags. Logs go to stderr so generated code
/// on stdout stays clean.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = level_for(verbose, quiet);

    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
