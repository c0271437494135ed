use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` wins when set; otherwise
/// warnings only, or debug output for our crates with `--verbose`.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "warn,explorer_core=debug,explorer_vndb=debug,explorer_orchestrator=debug,vndb_explorer=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
